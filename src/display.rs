// Display helpers shared by the browse view and the export table.

/// Alias applied to any project whose path mentions the renamed Hydra project.
const HYDRA_ALIAS: &str = "Hydra";

/// Last `/`-delimited segment of a remote path or global id
/// (`gid://gitlab/Project/42` -> `42`, `group/widgets` -> `widgets`).
pub fn last_segment(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or("")
}

/// Human display name for a project path.
pub fn project_display_name(path: &str) -> String {
  if path.to_lowercase().contains("hydra") {
    return HYDRA_ALIAS.to_string();
  }

  let segment = last_segment(path);
  let mut chars = segment.chars();

  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Render a duration as `<H>h <M>m`, truncating leftover seconds.
pub fn format_time_spent(seconds: u64) -> String {
  let hours = seconds / 3600;
  let minutes = (seconds % 3600) / 60;
  format!("{}h {}m", hours, minutes)
}

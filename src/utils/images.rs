/// Absolute references are used as-is, relative paths are joined to the API origin.
pub fn resolve_image_url(origin: &str, reference: &str) -> String {
	let reference = reference.trim();
	if reference.is_empty() {
		return String::new();
	}

	let lowered = reference.to_ascii_lowercase();
	if lowered.starts_with("http://") || lowered.starts_with("https://") || lowered.starts_with("data:") {
		return reference.to_string();
	}

	format!(
		"{}/{}",
		origin.trim_end_matches('/'),
		reference.trim_start_matches('/')
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_absolute_urls() {
		assert_eq!(
			resolve_image_url("http://api.local", "https://cdn.example/img/a.png"),
			"https://cdn.example/img/a.png"
		);
	}

	#[test]
	fn joins_relative_paths_with_one_slash() {
		assert_eq!(
			resolve_image_url("http://api.local/", "/uploads/a.png"),
			"http://api.local/uploads/a.png"
		);
		assert_eq!(
			resolve_image_url("http://api.local", "uploads/a.png"),
			"http://api.local/uploads/a.png"
		);
		assert_eq!(resolve_image_url("http://api.local", " "), "");
	}
}

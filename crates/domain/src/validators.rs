pub fn validate_filter_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }
    if url.len() > 2048 {
        return Err("URL cannot exceed 2048 characters".to_string());
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }
    if url.chars().any(char::is_whitespace) {
        return Err("URL cannot contain whitespace".to_string());
    }
    Ok(())
}

pub fn validate_filter_name(name: &str) -> Result<(), String> {
    if name.len() > 200 {
        return Err("Filter name cannot exceed 200 characters".to_string());
    }
    Ok(())
}

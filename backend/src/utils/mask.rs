//! Masking of personal data before it reaches the logs.

/// Masks an email address for logging: `john.doe@gmail.com` becomes `j***@gmail.com`.
pub fn mask_email(email: &str) -> String {
    if email.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return "***@***".to_string();
    }

    let (local, domain) = (parts[0], parts[1]);
    match local.chars().next() {
        Some(first) => format!("{}***@{}", first, domain),
        None => format!("***@{}", domain),
    }
}

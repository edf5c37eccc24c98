use rand::Rng;

/// Six-digit one-time code used for account confirmation and password resets.
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

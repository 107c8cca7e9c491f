pub const SDK_NAME: &str = "platform-services-rust-sdk";
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// value of the `User-Agent` header sent with every request
pub fn user_agent() -> String {
    format!("{}/{}", SDK_NAME, SDK_VERSION)
}

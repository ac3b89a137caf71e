use regex::Regex;
use std::sync::OnceLock;

/// Replace any unwanted character in resource name
/// with its uppercase-alpha counterpart
pub fn escape_resource_name(name: &str) -> String {
    name.replace("@", "AT")
        .replace(".", "DOT")
        .replace("-", "HYPHEN")
        .replace("_", "UNDRSC")
        .replace(" ", "SPACE")
}

/// CloudFormation only accepts alphanumeric logical IDs
pub fn is_valid_logical_name(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();

    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{1,255}$").expect("Static regex is valid"))
        .is_match(name)
}

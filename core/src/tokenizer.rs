use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Two or more word characters. Underscores count, so joined names stay whole.
    static ref RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
}

/// Tokenize combined text: lowercase, then keep every run of 2+ word characters in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// `host` is `rule_host` or one of its subdomains (ASCII case-insensitive).
pub fn hostname_matches(host: &str, rule_host: &str) -> bool {
    let host = host.trim_end_matches('.');
    let rule_host = rule_host.trim_end_matches('.');
    if rule_host.is_empty() || host.len() < rule_host.len() {
        return false;
    }
    let split = host.len() - rule_host.len();
    if !host.is_char_boundary(split) || !host[split..].eq_ignore_ascii_case(rule_host) {
        return false;
    }
    split == 0 || host.as_bytes()[split - 1] == b'.'
}

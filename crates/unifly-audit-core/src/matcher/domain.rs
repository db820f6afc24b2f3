// ── Web domain matching ──

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// `child` is a strict subdomain of `parent`, split on a label boundary.
fn is_subdomain(child: &str, parent: &str) -> bool {
    child
        .strip_suffix(parent)
        .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Whether two domains can name the same host.
///
/// `api.example.com` overlaps `example.com`; `notexample.com` does not.
pub fn domain_pair_overlaps(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || is_subdomain(&a, &b) || is_subdomain(&b, &a)
}

/// Whether any domain of `domains1` overlaps any domain of `domains2`.
pub fn domains_overlap<A, B>(domains1: &[A], domains2: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    domains1.iter().any(|a| {
        domains2
            .iter()
            .any(|b| domain_pair_overlaps(a.as_ref(), b.as_ref()))
    })
}

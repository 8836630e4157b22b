use url::Url;

/// Path suffixes that are never worth fetching as documentation pages.
pub const DENIED_EXTENSIONS: [&str; 4] = [".pdf", ".jpg", ".png", ".zip"];

/// Check if a URL is valid for crawling: same network location as the seed
/// and not a known binary download.
pub fn is_valid_subpage(candidate: &str, seed: &str) -> bool {
    let (Ok(candidate), Ok(seed)) = (Url::parse(candidate), Url::parse(seed)) else {
        return false;
    };

    same_network_location(&candidate, &seed) && !has_denied_extension(&candidate)
}

/// Host and explicit port must both match. No subdomain folding.
fn same_network_location(candidate: &Url, seed: &Url) -> bool {
    match (candidate.host_str(), seed.host_str()) {
        (Some(a), Some(b)) => a == b && candidate.port() == seed.port(),
        _ => false,
    }
}

fn has_denied_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    DENIED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

use super::ResolverSettings;
use crate::mode::DeploymentMode;

/// Base URL built assets are served from, always ending in `/`.
///
/// Development requests go to the local dev server, unless the request arrived through the
/// wildcard-DNS testing domain, where `localhost` would point at the visitor's machine.
pub fn dist_base_url(settings: &ResolverSettings, request_url: &str) -> String {
  let marker = settings.testing_domain_marker.as_str();
  let via_testing_domain = !marker.is_empty() && request_url.contains(marker);

  if settings.mode == DeploymentMode::Development && !via_testing_domain {
    return settings.dev_server_url.clone();
  }

  public_dist_url(&settings.app_url, &settings.dist_segment)
}

fn public_dist_url(app_url: &str, dist_segment: &str) -> String {
  let base = app_url.trim_end_matches('/');
  match dist_segment.trim_matches('/') {
    "" => format!("{base}/"),
    segment => format!("{base}/{segment}/"),
  }
}

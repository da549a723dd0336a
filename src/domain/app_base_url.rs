/// Public base URL the application is reachable under, used when a page has
/// to spell out an absolute link to another page.
#[derive(Clone, Debug)]
pub struct AppBaseUrl(pub String);

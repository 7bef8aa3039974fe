//! Static HTML pages.

/// Rendered for unknown pages and missing documentation.
pub const NOT_FOUND: &str = r#"<!DOCTYPE html>
<html>
  <head><title>404 - Page not found</title></head>
  <body>
    <h1>Page not found</h1>
    <p>The page you asked for doesn't exist. It may have moved when the documentation was rebuilt.</p>
    <p><a href="/">Back to the homepage</a></p>
  </body>
</html>
"#;

/// Rendered for unexpected server failures.
pub const SERVER_ERROR: &str = r#"<!DOCTYPE html>
<html>
  <head><title>500 - Server error</title></head>
  <body>
    <h1>Server error</h1>
    <p>Something went wrong on our side. The administrators have been told.</p>
    <p><a href="/">Back to the homepage</a></p>
  </body>
</html>
"#;

/// Explains how to point a repository's post-commit hook at the server.
pub const POST_COMMIT: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Post-commit hooks</title></head>
  <body>
    <h1>Post-commit hooks</h1>
    <p>Add <code>/github-hook/</code> as a WebHook URL in your GitHub repository settings,
    or <code>/bitbucket-hook/</code> as a POST service in Bitbucket.
    Every push rebuilds the matching version of your documentation.</p>
    <p>Any other system can <code>POST</code> to <code>/build/&lt;project id&gt;/</code>,
    optionally with a <code>version_slug</code> form field.</p>
  </body>
</html>
"#;

//! `sitemap.xml` rendering for published posts.

use crate::domain::Post;

const CHANGE_FREQUENCY: &str = "weekly";
const PRIORITY: &str = "0.9";

/// Render a sitemaps.org `urlset` listing every published post in `posts`.
///
/// `base_url` is the scheme and host prefix, e.g. `https://blog.example.com`.
pub fn render_sitemap(base_url: &str, posts: &[Post]) -> String {
    let base_url = base_url.trim_end_matches('/');

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for post in posts.iter().filter(|p| p.is_published()) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&format!("{}{}", base_url, post.absolute_url()))
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            post.publish.format("%Y-%m-%d")
        ));
        xml.push_str(&format!("    <changefreq>{CHANGE_FREQUENCY}</changefreq>\n"));
        xml.push_str(&format!("    <priority>{PRIORITY}</priority>\n"));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

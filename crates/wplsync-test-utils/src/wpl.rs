//! WPL playlist documents for tests.

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a playlist the way Windows Media Player writes one.
pub fn wpl_document(title: &str, sources: &[&str]) -> String {
    let mut doc = String::from("<?wpl version=\"1.0\"?>\n<smil>\n  <head>\n");
    doc.push_str(
        "    <meta name=\"Generator\" content=\"Microsoft Windows Media Player -- 12.0.19041.1\"/>\n",
    );
    doc.push_str(&format!("    <title>{}</title>\n", escape(title)));
    doc.push_str("  </head>\n  <body>\n    <seq>\n");
    for src in sources {
        doc.push_str(&format!("      <media src=\"{}\"/>\n", escape(src)));
    }
    doc.push_str("    </seq>\n  </body>\n</smil>\n");
    doc
}

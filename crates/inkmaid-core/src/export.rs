//! SVG export of the rendered diagram.

/// File name offered for downloads and save dialogs.
pub const EXPORT_FILE_NAME: &str = "diagram.svg";

/// Media type of exported files.
pub const EXPORT_MIME: &str = "image/svg+xml";

/// A ready-to-save SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgExport {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub contents: String,
}

impl SvgExport {
    /// Build an export from rendered markup.
    ///
    /// Returns `None` when the markup holds no `<svg` element. Anything in
    /// front of the element (XML declaration, doctype, comments) is dropped.
    pub fn from_markup(markup: &str) -> Option<Self> {
        let start = markup.find("<svg")?;
        let contents = markup[start..].trim_end().to_string();
        Some(Self {
            file_name: EXPORT_FILE_NAME,
            mime: EXPORT_MIME,
            contents,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_plain_svg() {
        let export = SvgExport::from_markup("<svg id=\"d\"><g/></svg>").unwrap();
        assert_eq!(export.file_name, "diagram.svg");
        assert_eq!(export.mime, "image/svg+xml");
        assert_eq!(export.contents, "<svg id=\"d\"><g/></svg>");
    }

    #[test]
    fn test_export_strips_prolog() {
        let markup = "<?xml version=\"1.0\"?>\n<!-- generated -->\n<svg></svg>\n";
        let export = SvgExport::from_markup(markup).unwrap();
        assert_eq!(export.contents, "<svg></svg>");
        assert_eq!(export.as_bytes(), b"<svg></svg>");
    }

    #[test]
    fn test_export_without_svg_is_none() {
        assert_eq!(SvgExport::from_markup(""), None);
        assert_eq!(SvgExport::from_markup("<div>Syntax Error</div>"), None);
    }
}

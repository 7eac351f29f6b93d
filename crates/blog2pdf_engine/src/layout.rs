use bytes::Bytes;

/// Post-processing applied to a converted document before it is handed out.
pub trait LayoutTransform: Send + Sync {
    fn apply(&self, document: Bytes) -> Bytes;
}

/// Keeps the backend's layout untouched: the document is returned as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreserveLayout;

impl LayoutTransform for PreserveLayout {
    fn apply(&self, document: Bytes) -> Bytes {
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserve_layout_is_identity() {
        let doc = Bytes::from_static(b"%PDF-1.4 body");
        assert_eq!(PreserveLayout.apply(doc.clone()), doc);
    }
}

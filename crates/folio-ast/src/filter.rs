//! Node-level filter callbacks and the traversal that drives them.

use crate::node::{Attr, Block, ContentMut, Document, Inline, Target};

/// Callbacks invoked while a document is traversed.
///
/// Every method defaults to "leave the node unchanged". Returning `Some`
/// replaces the visited node.
///
/// Traversal order (see [`apply_filter`]):
///
/// 1. Blocks are visited in document order. [`div`](Self::div) and
///    [`para`](Self::para) run before the block's content is visited; a
///    replacement is not descended into.
/// 2. [`image`](Self::image) runs for every image inside content that was
///    not replaced, footnotes, table cells and definition lists included.
/// 3. [`document`](Self::document) runs once after every node was visited.
pub trait Filter {
    /// Called for each generic container block.
    fn div(&mut self, attr: &Attr, content: &[Block]) -> Option<Block> {
        let _ = (attr, content);
        None
    }

    /// Called for each paragraph.
    fn para(&mut self, content: &[Inline]) -> Option<Block> {
        let _ = content;
        None
    }

    /// Called for each image.
    fn image(&mut self, attr: &Attr, description: &[Inline], target: &Target) -> Option<Inline> {
        let _ = (attr, description, target);
        None
    }

    /// Called once with the whole document after the node callbacks ran.
    fn document(&mut self, doc: &mut Document) {
        let _ = doc;
    }
}

/// Run `filter` over `doc`.
pub fn apply_filter<F: Filter + ?Sized>(doc: &mut Document, filter: &mut F) {
    walk_blocks(&mut doc.blocks, filter);
    filter.document(doc);
}

fn walk_blocks<F: Filter + ?Sized>(blocks: &mut [Block], filter: &mut F) {
    for block in blocks {
        walk_block(block, filter);
    }
}

fn walk_block<F: Filter + ?Sized>(block: &mut Block, filter: &mut F) {
    let replacement = match block {
        Block::Div(attr, content) => filter.div(attr, content),
        Block::Para(content) => filter.para(content),
        _ => None,
    };
    if let Some(replacement) = replacement {
        *block = replacement;
        return;
    }

    for child in block.children_mut() {
        walk_content(child, filter);
    }
}

fn walk_content<F: Filter + ?Sized>(content: ContentMut<'_>, filter: &mut F) {
    match content {
        ContentMut::Blocks(blocks) => walk_blocks(blocks, filter),
        ContentMut::Inlines(inlines) => walk_inlines(inlines, filter),
    }
}

fn walk_inlines<F: Filter + ?Sized>(inlines: &mut [Inline], filter: &mut F) {
    for inline in inlines {
        if let Inline::Image(attr, description, target) = inline
            && let Some(replacement) = filter.image(attr, description, target)
        {
            *inline = replacement;
            continue;
        }

        if let Some(child) = inline.children_mut() {
            walk_content(child, filter);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::Marker;

    /// Records the order of callbacks and replaces images with markers.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        document_saw_markers: bool,
    }

    impl Filter for Recorder {
        fn div(&mut self, attr: &Attr, _content: &[Block]) -> Option<Block> {
            self.calls.push(format!("div:{}", attr.id));
            attr.has_class("swap")
                .then(|| Block::raw("opendocument", "DIV"))
        }

        fn para(&mut self, content: &[Inline]) -> Option<Block> {
            self.calls.push(format!("para:{}", crate::stringify(content)));
            None
        }

        fn image(&mut self, _attr: &Attr, _description: &[Inline], target: &Target) -> Option<Inline> {
            self.calls.push(format!("image:{}", target.url));
            Some(Inline::Marker(Marker::new("opendocument", target.url.clone())))
        }

        fn document(&mut self, doc: &mut Document) {
            self.calls.push("document".to_owned());
            self.document_saw_markers = doc.contains_markers();
        }
    }

    fn image(url: &str) -> Inline {
        Inline::Image(Attr::default(), Vec::new(), Target::new(url))
    }

    #[test]
    fn test_callback_order() {
        let mut doc = Document::new(vec![
            Block::Para(vec![Inline::Str("one".to_owned()), image("a.png")]),
            Block::Div(
                Attr { id: "d".to_owned(), ..Attr::default() },
                vec![Block::Plain(vec![Inline::Emph(vec![image("b.png")])])],
            ),
        ]);
        let mut recorder = Recorder::default();

        apply_filter(&mut doc, &mut recorder);

        assert_eq!(
            recorder.calls,
            vec!["para:one", "image:a.png", "div:d", "image:b.png", "document"]
        );
        assert!(recorder.document_saw_markers);
    }

    #[test]
    fn test_replaced_block_not_descended() {
        let mut doc = Document::new(vec![Block::Div(
            Attr::default().with_classes(["swap"]),
            vec![Block::Para(vec![image("inner.png")])],
        )]);
        let mut recorder = Recorder::default();

        apply_filter(&mut doc, &mut recorder);

        assert_eq!(recorder.calls, vec!["div:", "document"]);
        assert_eq!(doc.blocks, vec![Block::raw("opendocument", "DIV")]);
    }

    #[test]
    fn test_lists_and_quotes_are_walked() {
        let mut doc = Document::new(vec![
            Block::BulletList(vec![vec![Block::Plain(vec![image("l.png")])]]),
            Block::BlockQuote(vec![Block::Para(vec![Inline::Link(
                Attr::default(),
                vec![image("q.png")],
                Target::new("https://example.com"),
            )])]),
        ]);
        let mut recorder = Recorder::default();

        apply_filter(&mut doc, &mut recorder);

        assert!(recorder.calls.contains(&"image:l.png".to_owned()));
        assert!(recorder.calls.contains(&"image:q.png".to_owned()));
    }

    #[test]
    fn test_footnotes_tables_and_definitions_are_walked() {
        let json = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[
            {"t":"Para","c":[{"t":"Str","c":"x"},{"t":"Note","c":[{"t":"Div","c":[["n",[],[]],[]]}]}]},
            {"t":"DefinitionList","c":[[[{"t":"Strikeout","c":[{"t":"Image","c":[["",[],[]],[],["term.png",""]]}]}],
                [[{"t":"Plain","c":[{"t":"Image","c":[["",[],[]],[],["def.png",""]]}]}]]]]},
            {"t":"Table","c":[["",[],[]],[null,[]],[[{"t":"AlignDefault"},{"t":"ColWidthDefault"}]],
                [["",[],[]],[]],
                [[["",[],[]],0,[],[[["",[],[]],[[["",[],[]],{"t":"AlignDefault"},1,1,
                    [{"t":"Plain","c":[{"t":"Image","c":[["",[],[]],[],["cell.png",""]]}]}]]]]]]],
                [["",[],[]],[]]]}
        ]}"#;
        let mut doc = Document::from_json_str(json).unwrap();
        let mut recorder = Recorder::default();

        apply_filter(&mut doc, &mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                "para:x",
                "div:n",
                "image:term.png",
                "image:def.png",
                "image:cell.png",
                "document",
            ]
        );
    }

    #[test]
    fn test_default_filter_is_identity() {
        struct Noop;
        impl Filter for Noop {}

        let original = Document::new(vec![Block::Para(vec![image("a.png")])]);
        let mut doc = original.clone();
        apply_filter(&mut doc, &mut Noop);

        assert_eq!(doc, original);
    }
}

use crate::tree::NodeId;
use folio_traits::{Canvas, DocumentSink};

/// State threaded through one paint pass of a page.
///
/// `deferred` collects floats, transformed boxes and outline boxes met
/// while painting flow content; they are painted in append order once the
/// flow pass is done.
pub struct DrawContext<'a> {
    pub canvas: &'a mut dyn Canvas,
    pub document: &'a mut dyn DocumentSink,
    pub deferred: Vec<NodeId>,
    pub page_number: usize,
}

impl<'a> DrawContext<'a> {
    pub fn new(canvas: &'a mut dyn Canvas, document: &'a mut dyn DocumentSink, page_number: usize) -> Self {
        document.ensure_page(page_number);
        Self {
            canvas,
            document,
            deferred: Vec::new(),
            page_number,
        }
    }

    pub fn defer(&mut self, id: NodeId) {
        self.deferred.push(id);
    }
}

//! Pagination driver.
//!
//! Root flow children are placed top to bottom in the content area of each
//! page. A child that does not fit is retried on a fresh page, where it is
//! forced so that every page makes progress. A child that fits in part
//! leaves its overflow fragment at the head of the queue for the next page.

use crate::LayoutError;
use crate::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutStatus};
use crate::model::SharedElement;
use crate::nodes::{self, block::FlowCursor};
use crate::painting::{DrawContext, drain_deferred, draw_child};
use crate::positioning::layout_absolute;
use crate::tree::{NodeId, RenderTree};
use folio_traits::{Canvas, DocumentSink};
use folio_types::Rect;
use std::collections::VecDeque;

/// One painted page.
#[derive(Debug, Clone)]
pub struct PageOutput<C> {
    pub page_number: usize,
    pub canvas: C,
}

/// Fragments placed on one page, waiting to be painted.
#[derive(Debug, Default)]
struct PageLayout {
    page_number: usize,
    fragments: Vec<NodeId>,
    positioned: Vec<NodeId>,
}

pub struct DocumentRenderer<'a> {
    env: LayoutEnvironment<'a>,
    tree: RenderTree,
    root: NodeId,
}

impl<'a> DocumentRenderer<'a> {
    /// Builds the renderer tree for `document`.
    pub fn new(env: LayoutEnvironment<'a>, document: &SharedElement) -> Self {
        let mut tree = RenderTree::new();
        let root = tree.build(document);
        Self { env, tree, root }
    }

    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn page_rect(&self) -> Rect {
        let (width, height) = self.env.config.page_dimensions();
        Rect::new(0.0, 0.0, width, height)
    }

    fn content_rect(&self) -> Rect {
        let m = &self.env.config.margins;
        self.page_rect().apply_edges(m.top, m.right, m.bottom, m.left, false)
    }

    /// Lays out the whole document and paints every page into a fresh
    /// canvas. Destinations and annotations go to `document`.
    ///
    /// A document renders once; calling this again is an error because the
    /// tree has already been flushed.
    pub fn render<C: Canvas + Default>(
        &mut self,
        document: &mut dyn DocumentSink,
    ) -> Result<Vec<PageOutput<C>>, LayoutError> {
        if self.tree.is_flushed(self.root) {
            return Err(LayoutError::InvalidTree(
                "document has already been rendered".to_string(),
            ));
        }

        let mut queue: VecDeque<NodeId> = self.tree.children(self.root).iter().copied().collect();
        let mut outputs = Vec::new();
        let mut pending = Vec::new();
        let mut placed = Vec::new();
        let mut page_number = 0;

        while page_number == 0 || !queue.is_empty() {
            page_number += 1;
            if page_number > self.env.config.max_pages {
                return Err(LayoutError::Generic(format!(
                    "Page limit exceeded ({})",
                    self.env.config.max_pages
                )));
            }

            let page = self.layout_page(page_number, &mut queue)?;
            log::debug!(
                "Page {} holds {} fragments, {} left in queue",
                page_number,
                page.fragments.len(),
                queue.len()
            );
            placed.extend_from_slice(&page.fragments);
            if self.env.config.immediate_flush {
                outputs.push(self.paint_page(page, document)?);
            } else {
                pending.push(page);
            }
        }
        for page in pending {
            outputs.push(self.paint_page(page, document)?);
        }

        self.tree.set_children(self.root, placed);
        self.tree.mark_flushed(self.root)?;
        Ok(outputs)
    }

    fn layout_page(
        &mut self,
        page_number: usize,
        queue: &mut VecDeque<NodeId>,
    ) -> Result<PageLayout, LayoutError> {
        let env = self.env;
        let content = self.content_rect();
        let page_rect = self.page_rect();
        let tree = &mut self.tree;
        tree.set_occupied(self.root, LayoutArea::new(page_number, content));

        let mut page = PageLayout {
            page_number,
            ..PageLayout::default()
        };
        let mut flow = FlowCursor::new(content.top());

        while let Some(child) = queue.pop_front() {
            let rect = flow.child_area(tree, child, content, &env)?;
            let empty_page = page.fragments.is_empty();
            let ctx = LayoutContext::new(LayoutArea::new(page_number, rect)).forced(empty_page);

            let result = nodes::layout(tree, child, &ctx, &env)?;
            if let Some(occupied) = result.occupied {
                flow.advance(tree, child, occupied.rect);
            }
            match result.status {
                LayoutStatus::Full => page.fragments.push(child),
                LayoutStatus::Partial => {
                    page.fragments.extend(result.split);
                    if let Some(overflow) = result.overflow {
                        queue.push_front(overflow);
                    }
                    break;
                }
                LayoutStatus::Nothing if empty_page => {
                    log::error!(
                        "{} node {} cannot be placed even on an empty page {:?}; dropping it",
                        tree.node(child).kind.name(),
                        child.index(),
                        content
                    );
                }
                LayoutStatus::Nothing => {
                    queue.push_front(child);
                    break;
                }
            }
        }

        for fragment in &page.fragments {
            tree.node_mut(*fragment).parent = Some(self.root);
        }

        if page_number == 1 {
            let page_area = LayoutArea::new(page_number, page_rect);
            for child in tree.positioned_children(self.root).to_vec() {
                layout_absolute(tree, self.root, child, page_area, &env)?;
            }
            // Partial results may have swapped children for their split.
            page.positioned = tree.positioned_children(self.root).to_vec();
        }
        Ok(page)
    }

    fn paint_page<C: Canvas + Default>(
        &mut self,
        page: PageLayout,
        document: &mut dyn DocumentSink,
    ) -> Result<PageOutput<C>, LayoutError> {
        let mut canvas = C::default();
        {
            let mut ctx = DrawContext::new(&mut canvas, document, page.page_number);
            for fragment in page.fragments {
                draw_child(&mut self.tree, fragment, &mut ctx)?;
            }
            for child in page.positioned {
                if self.tree.occupied(child).is_none() {
                    log::warn!("Positioned node {} was never placed, skipping", child.index());
                    continue;
                }
                draw_child(&mut self.tree, child, &mut ctx)?;
            }
            drain_deferred(&mut self.tree, &mut ctx)?;
        }
        Ok(PageOutput {
            page_number: page.page_number,
            canvas,
        })
    }
}

//! Static fallback dataset.
//!
//! When the page store is unreachable, the editor (and the public site)
//! can still open the stock marketing pages. These mirror the content the
//! site ships with before any CMS edits.

use serde_json::json;

use pulsefit_core::block::BlockKind;
use pulsefit_core::page::{PageStatus, PageTemplate};
use pulsefit_core::types::DbId;

use crate::store::{BlockDraft, PageDocument};

/// Look up a fallback page by slug or id-as-string.
pub fn find(slug_or_id: &str) -> Option<PageDocument> {
    let pages = default_pages();
    match slug_or_id.parse::<DbId>() {
        Ok(id) => pages.into_iter().find(|p| p.id == Some(id)),
        Err(_) => pages.into_iter().find(|p| p.slug == slug_or_id),
    }
}

/// The stock marketing pages.
pub fn default_pages() -> Vec<PageDocument> {
    vec![
        page(
            1,
            "home",
            "Home",
            vec![
                block(11, BlockKind::Hero, json!({
                    "title": "Train With Purpose",
                    "subtitle": "Personal coaching for every level",
                    "image": "/img/hero-home.jpg"
                })),
                block(12, BlockKind::Features, json!({
                    "items": [
                        {"title": "1:1 Coaching", "text": "A plan built around you"},
                        {"title": "Small Groups", "text": "Train with up to four people"},
                        {"title": "Nutrition", "text": "Guidance that fits your life"}
                    ]
                })),
                block(13, BlockKind::Testimonial, json!({
                    "quote": "Down 12kg and stronger than ever.",
                    "author": "Maria K."
                })),
                block(14, BlockKind::Button, json!({
                    "label": "Book a free consultation",
                    "href": "/consultation"
                })),
            ],
        ),
        page(
            2,
            "programs",
            "Programs",
            vec![
                block(21, BlockKind::Hero, json!({
                    "title": "Programs",
                    "subtitle": "Strength, conditioning, mobility"
                })),
                block(22, BlockKind::Pricing, json!({
                    "plans": [
                        {"name": "Starter", "price": "49/mo"},
                        {"name": "Committed", "price": "89/mo"},
                        {"name": "All-In", "price": "139/mo"}
                    ]
                })),
            ],
        ),
        page(
            3,
            "consultation",
            "Book a Consultation",
            vec![
                block(31, BlockKind::Hero, json!({
                    "title": "Book a Free Consultation"
                })),
                block(32, BlockKind::Form, json!({"form": "consultation"})),
            ],
        ),
        page(
            4,
            "trainers",
            "Join Our Team",
            vec![
                block(41, BlockKind::Hero, json!({
                    "title": "Coach With Us",
                    "subtitle": "We are hiring certified trainers"
                })),
                block(42, BlockKind::Form, json!({"form": "trainer"})),
            ],
        ),
        page(
            5,
            "corporate",
            "Corporate Wellness",
            vec![
                block(51, BlockKind::Hero, json!({
                    "title": "Corporate Wellness",
                    "subtitle": "Healthier teams do better work"
                })),
                block(52, BlockKind::Text, json!({
                    "text": "On-site classes, workshops, and wellness programs for companies of any size."
                })),
                block(53, BlockKind::Form, json!({"form": "corporate"})),
            ],
        ),
    ]
}

fn page(id: DbId, slug: &str, title: &str, blocks: Vec<BlockDraft>) -> PageDocument {
    let mut doc = PageDocument::new(slug, title);
    doc.id = Some(id);
    doc.status = PageStatus::Published;
    doc.template = PageTemplate::Landing;
    doc.version_number = 1;
    doc.blocks = blocks
        .into_iter()
        .enumerate()
        .map(|(i, mut b)| {
            b.sort_order = i as i32;
            b
        })
        .collect();
    doc
}

fn block(id: DbId, kind: BlockKind, data: serde_json::Value) -> BlockDraft {
    BlockDraft {
        id: Some(id),
        kind,
        sort_order: 0,
        data,
        styles: None,
        is_active: true,
    }
}

// Phase 5: 描画テンプレート（Form XObject 相当）-> ImageRecord

use std::sync::Arc;

use tracing::debug;

use super::{ImagePayload, ImageRecord};
use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Form,
    Pattern,
}

/// 事前に描画された再利用可能なテンプレート。
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingTemplate {
    pub kind: TemplateKind,
    pub width: f32,
    pub height: f32,
}

impl DrawingTemplate {
    pub fn form(width: f32, height: f32) -> Self {
        Self {
            kind: TemplateKind::Form,
            width,
            height,
        }
    }

    pub fn pattern(width: f32, height: f32) -> Self {
        Self {
            kind: TemplateKind::Pattern,
            width,
            height,
        }
    }
}

/// テンプレートを画像として包む。
///
/// レコードは非所有参照（`Weak`）を保持するため、テンプレートの寿命を延ばさない。
pub fn build_template_image(
    template: Option<&Arc<DrawingTemplate>>,
) -> crate::error::Result<ImageRecord> {
    let template =
        template.ok_or_else(|| IngestError::bad_format("the template can not be null"))?;
    if template.kind == TemplateKind::Pattern {
        return Err(IngestError::bad_format(
            "a pattern can not be used as a template to create an image",
        ));
    }

    debug!(
        width = template.width,
        height = template.height,
        "built template image record"
    );

    ImageRecord::new(
        template.width,
        template.height,
        ImagePayload::Template(Arc::downgrade(template)),
    )
}


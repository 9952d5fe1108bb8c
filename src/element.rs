// Phase 6: 文書要素インタフェース（文書モデル層との唯一の接点）

use crate::image::{ImageKind, ImageRecord};

/// 文書要素の型タグ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// CCITT で圧縮された生データを持つ画像
    ImgRaw,
    /// JBIG2 画像（グローバルセグメントを共有し得る）
    Jbig2,
    /// テンプレート経由で描画される画像（メタファイル含む）
    ImgTemplate,
}

/// 要素を受け取る側（文書モデル層）。
pub trait ElementListener {
    /// 要素を受け付けたら `true`。
    fn element(&mut self, element: &dyn Element) -> bool;
}

/// 文書に追加できる要素。
pub trait Element {
    fn element_type(&self) -> ElementType;

    fn is_nestable(&self) -> bool;

    fn is_content(&self) -> bool;

    /// 自分自身をリスナーに渡す。
    fn process(&self, listener: &mut dyn ElementListener) -> bool;
}

impl Element for ImageRecord {
    fn element_type(&self) -> ElementType {
        match self.kind() {
            ImageKind::Raw => ElementType::ImgRaw,
            ImageKind::Jbig2 => ElementType::Jbig2,
            ImageKind::Template | ImageKind::Wmf => ElementType::ImgTemplate,
        }
    }

    fn is_nestable(&self) -> bool {
        true
    }

    fn is_content(&self) -> bool {
        true
    }

    fn process(&self, listener: &mut dyn ElementListener) -> bool {
        listener.element(self)
    }
}

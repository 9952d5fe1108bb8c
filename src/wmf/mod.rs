pub mod header;
pub mod reader;

use tracing::debug;

use crate::error::IngestError;
use crate::image::{ImagePayload, ImageRecord};
use crate::source::ByteSource;
use header::{WMF_DPI, WmfHeader, parse_header};
use reader::{MetafileInterpreter, RenderTarget, skip_placeable_header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmfState {
    HeaderValidated,
    Rendered,
}

/// ヘッダー検証済みの placeable metafile。
///
/// 構築時にヘッダーを読み（ストリームは即座に解放）、寸法を確定する。
/// 本体のテンプレートへの書き出しは任意で、高々1回。
pub struct WmfImage<S: ByteSource> {
    source: S,
    header: WmfHeader,
    record: ImageRecord,
    state: WmfState,
}

impl<S: ByteSource> WmfImage<S> {
    /// ヘッダーを解析して寸法を計算する。
    pub fn parse(source: S) -> crate::error::Result<Self> {
        let header = parse_header(&source)?;
        let (width, height) = header.size_in_points(source.id())?;

        let record = ImageRecord::new(
            width,
            height,
            ImagePayload::Wmf {
                data: source.in_memory(),
            },
        )?
        .with_dpi(WMF_DPI, WMF_DPI);

        debug!(source = source.id(), width, height, "parsed placeable metafile header");

        Ok(Self {
            source,
            header,
            record,
            state: WmfState::HeaderValidated,
        })
    }

    pub fn header(&self) -> &WmfHeader {
        &self.header
    }

    pub fn record(&self) -> &ImageRecord {
        &self.record
    }

    pub fn state(&self) -> WmfState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// ソースを先頭から開き直し、本体を `target` に流し込む。
    ///
    /// 描画先の寸法はヘッダーから計算したポイント寸法に設定される。
    /// ストリームは成功・失敗いずれでも呼び出し終了時に解放される。
    pub fn render_template(
        &mut self,
        target: &mut dyn RenderTarget,
        interpreter: &mut dyn MetafileInterpreter,
    ) -> crate::error::Result<()> {
        if self.state == WmfState::Rendered {
            return Err(IngestError::invalid_input(format!(
                "{} has already been rendered",
                self.source.id()
            )));
        }

        let id = self.source.id();
        let mut stream = self.source.open()?;
        skip_placeable_header(&mut *stream, id)?;

        target.set_size(self.record.width(), self.record.height());
        interpreter.paint(&mut *stream, target, id)?;
        drop(stream);

        debug!(source = id, "rendered metafile into template");
        self.state = WmfState::Rendered;
        Ok(())
    }

    /// 画像レコードを取り出す。
    pub fn into_record(self) -> ImageRecord {
        self.record
    }
}

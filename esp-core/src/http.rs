//! JSON-Antworten für picoserve
//!
//! Ein Status-Dokument wird in einen Buffer fester Größe gerendert und als
//! `application/json` ausgeliefert. Als Handler-Rückgabe ergibt das immer 200.

use picoserve::io::Write;
use picoserve::response::Content;
use serde::Serialize;

use crate::logic::render_json;
use crate::types::StatusError;

/// Gerendertes JSON-Dokument mit Platz für `N` Bytes
pub struct JsonBody<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> JsonBody<N> {
    /// Rendert `document` in einen neuen Buffer
    pub fn render<T: Serialize>(document: &T) -> Result<Self, StatusError> {
        let mut buf = [0u8; N];
        let len = render_json(document, &mut buf)?.len();
        Ok(Self { buf, len })
    }

    /// Leeres Objekt `{}` (Antwort, wenn das Rendern fehlschlägt)
    pub fn empty() -> Self {
        const EMPTY: &[u8] = b"{}";
        let mut buf = [0u8; N];
        let len = EMPTY.len().min(N);
        buf[..len].copy_from_slice(&EMPTY[..len]);
        Self { buf, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl<const N: usize> Content for JsonBody<N> {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn content_length(&self) -> usize {
        self.len
    }

    async fn write_content<W: Write>(self, mut writer: W) -> Result<(), W::Error> {
        writer.write_all(self.as_bytes()).await
    }
}

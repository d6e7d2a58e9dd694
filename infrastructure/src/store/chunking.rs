//! Character-window chunking with overlap.

/// Split `text` into windows of `chunk_size` characters, consecutive
/// windows sharing `chunk_overlap` characters.
///
/// An overlap at or above the chunk size is reduced to `chunk_size - 1` so
/// the window always advances. A `chunk_size` of 0 keeps the text whole.
/// Whitespace-only windows are dropped.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    if chunk_size == 0 || chars.len() <= chunk_size {
        return vec![text.trim().to_string()];
    }

    let overlap = chunk_overlap.min(chunk_size - 1);
    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        if end >= chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

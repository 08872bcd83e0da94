use crate::fonts::FontFace;

pub(crate) struct WordChunk {
    pub(crate) text: String,
    pub(crate) x_offset: f32, // x relative to line start
    pub(crate) width: f32,
}

pub(crate) struct TextLine {
    pub(crate) chunks: Vec<WordChunk>,
    pub(crate) total_width: f32,
}

impl TextLine {
    /// The line as one string, words joined by single spaces.
    pub(crate) fn text(&self) -> String {
        let mut out = String::new();
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&chunk.text);
        }
        out
    }
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    TextLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

/// Greedy word wrap. `\n` forces a break; a word wider than `max_width` gets a line
/// of its own and overflows. Always returns at least one line.
pub(crate) fn build_lines(
    text: &str,
    face: &FontFace,
    font_size: f32,
    max_width: f32,
) -> Vec<TextLine> {
    let space_w = face.space_width(font_size);
    let mut lines: Vec<TextLine> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_chunks: Vec<WordChunk> = Vec::new();
        let mut current_x: f32 = 0.0;

        for word in paragraph.split_whitespace() {
            let ww = face.text_width(word, font_size);
            let proposed_x = if current_chunks.is_empty() {
                current_x
            } else {
                current_x + space_w
            };

            if !current_chunks.is_empty() && proposed_x + ww > max_width {
                lines.push(finish_line(&mut current_chunks));
                current_x = 0.0;
            } else {
                current_x = proposed_x;
            }

            current_chunks.push(WordChunk {
                text: word.to_string(),
                x_offset: current_x,
                width: ww,
            });
            current_x += ww;
        }

        // Empty paragraphs still take a line, like a blank line in a textarea.
        lines.push(finish_line(&mut current_chunks));
    }

    if lines.is_empty() {
        lines.push(TextLine {
            chunks: vec![],
            total_width: 0.0,
        });
    }
    lines
}

/// Widest unwrapped paragraph.
pub(crate) fn natural_width(text: &str, face: &FontFace, font_size: f32) -> f32 {
    let space_w = face.space_width(font_size);
    text.split('\n')
        .map(|paragraph| {
            let mut width = 0.0;
            for (i, word) in paragraph.split_whitespace().enumerate() {
                if i > 0 {
                    width += space_w;
                }
                width += face.text_width(word, font_size);
            }
            width
        })
        .fold(0.0, f32::max)
}

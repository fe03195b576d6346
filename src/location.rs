//! Conversion of byte offsets into 1-based line:column positions.

#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of each line start
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset into a 1-based (line, column) pair. The column
    /// counts characters, not bytes.
    pub fn line_col(&self, source: &str, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let column = source[line_start..offset.min(source.len())].chars().count();
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        let source = "abc\ndef\n";
        let index = LineIndex::new(source);
        assert_eq!(index.line_col(source, 0), (1, 1));
        assert_eq!(index.line_col(source, 2), (1, 3));
    }

    #[test]
    fn test_later_lines() {
        let source = "abc\ndef\nghi";
        let index = LineIndex::new(source);
        assert_eq!(index.line_col(source, 4), (2, 1));
        assert_eq!(index.line_col(source, 9), (3, 2));
    }

    #[test]
    fn test_multibyte_column() {
        let source = "// über\nx";
        let index = LineIndex::new(source);
        let offset = source.find('x').unwrap();
        assert_eq!(index.line_col(source, offset), (2, 1));
    }
}

//! ファイル先頭バイトからの拡張子推定
//!
//! メタデータの無いファイルを復元する際に表示名の拡張子を決めるための純粋関数。
//! ファイルシステムには触れない。

/// 推定に使う先頭バイト数
pub const SNIFF_SAMPLE_LEN: usize = 1024;

/// 読み込みに失敗した場合の拡張子
pub const UNKNOWN_EXTENSION: &str = ".unknown";

const TEXT_EXTENSION: &str = ".txt";
const BINARY_EXTENSION: &str = ".bin";

/// (先頭バイト列, 拡張子) の表。先に一致したものが優先される
const SIGNATURES: &[(&[u8], &str)] = &[
    (&[0xFF, 0xD8, 0xFF], ".jpg"),
    (&[0x89, 0x50, 0x4E, 0x47], ".png"),
    (&[0x47, 0x49, 0x46, 0x38], ".gif"),
    (&[0x25, 0x50, 0x44, 0x46], ".pdf"),
    (&[0x50, 0x4B, 0x03, 0x04], ".zip"),
    (&[0x50, 0x4B, 0x05, 0x06], ".zip"),
    (&[0xD0, 0xCF, 0x11, 0xE0], ".doc"),
];

/// Guess a file extension (with leading dot) from the leading bytes of a file.
///
/// Known binary signatures win; otherwise a sample made only of tab, LF, CR
/// and printable ASCII is treated as text, and anything else as `.bin`.
pub fn detect_extension(sample: &[u8]) -> &'static str {
    if let Some(&(_, extension)) = SIGNATURES
        .iter()
        .find(|(signature, _)| sample.starts_with(signature))
    {
        return extension;
    }

    let sample = &sample[..sample.len().min(SNIFF_SAMPLE_LEN)];
    if sample.iter().all(|&b| is_text_byte(b)) {
        TEXT_EXTENSION
    } else {
        BINARY_EXTENSION
    }
}

fn is_text_byte(byte: u8) -> bool {
    matches!(byte, 0x09 | 0x0A | 0x0D | 0x20..=0x7E)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_signatures() {
        // テスト項目: 既知のシグネチャから拡張子が推定される
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(detect_extension(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), ".jpg");
        assert_eq!(detect_extension(b"\x89PNG\r\n\x1a\n"), ".png");
        assert_eq!(detect_extension(b"GIF89a"), ".gif");
        assert_eq!(detect_extension(b"%PDF-1.7"), ".pdf");
        assert_eq!(detect_extension(b"PK\x03\x04rest"), ".zip");
        assert_eq!(detect_extension(b"PK\x05\x06"), ".zip");
        assert_eq!(detect_extension(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1]), ".doc");
    }

    #[test]
    fn test_detect_text() {
        // テスト項目: 印字可能 ASCII と改行・タブのみならテキストと判定される
        // given (前提条件):
        let sample = b"hello world\r\n\tindented line\n";

        // when (操作):
        let extension = detect_extension(sample);

        // then (期待する結果):
        assert_eq!(extension, ".txt");
    }

    #[test]
    fn test_detect_empty_sample_as_text() {
        // テスト項目: 空のファイルはテキスト扱いになる
        // given (前提条件) / when (操作):
        let extension = detect_extension(&[]);

        // then (期待する結果):
        assert_eq!(extension, ".txt");
    }

    #[test]
    fn test_detect_unknown_binary() {
        // テスト項目: 制御文字や非 ASCII を含むものはバイナリと判定される
        // given (前提条件):
        let with_nul = b"abc\x00def";
        let with_utf8 = "한글 텍스트".as_bytes();

        // when (操作) / then (期待する結果):
        assert_eq!(detect_extension(with_nul), ".bin");
        assert_eq!(detect_extension(with_utf8), ".bin");
    }

    #[test]
    fn test_detect_only_inspects_sample_prefix() {
        // テスト項目: 先頭 1024 バイトより後ろのバイトは判定に使われない
        // given (前提条件):
        let mut sample = vec![b'a'; SNIFF_SAMPLE_LEN];
        sample.push(0x00);

        // when (操作):
        let extension = detect_extension(&sample);

        // then (期待する結果):
        assert_eq!(extension, ".txt");
    }
}

//! Helvetica metrics, truncation and WinAnsi encoding for the standard PDF fonts.

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space ../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // { | } ~
];

const DEFAULT_WIDTH: u16 = 556;

/// Helvetica advance of one character, in 1/1000 em
pub fn helvetica_width(c: char) -> f32 {
    let units = match c {
        ' '..='~' => HELVETICA_ASCII[c as usize - 0x20],
        '\u{2014}' => 1000,
        '\u{2013}' | '\u{2022}' => 556,
        '\u{2026}' => 1000,
        '\u{00A0}' => 278,
        _ => DEFAULT_WIDTH,
    };
    f32::from(units)
}

/// Truncation shared by every face. `advances` holds one entry per char of
/// `text` and `ellipsis` the advance of "...", both in 1/1000 em.
pub fn fit_measured(text: &str, advances: &[f32], ellipsis: f32, size: f32, max_width: f32) -> String {
    let scale = size / 1000.0;
    if advances.iter().sum::<f32>() * scale <= max_width {
        return text.to_string();
    }

    let budget = max_width - ellipsis * scale;
    if budget <= 0.0 {
        return String::new();
    }

    let mut used = 0.0;
    let mut out = String::new();
    for (c, advance) in text.chars().zip(advances) {
        let w = advance * scale;
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Encode text as WinAnsi bytes; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(text: &str, size: f32) -> f32 {
        text.chars().map(helvetica_width).sum::<f32>() * size / 1000.0
    }

    fn fit(text: &str, size: f32, max_width: f32) -> String {
        let advances: Vec<f32> = text.chars().map(helvetica_width).collect();
        fit_measured(text, &advances, 3.0 * helvetica_width('.'), size, max_width)
    }

    #[test]
    fn measures_known_glyphs() {
        assert_eq!(width("", 10.0), 0.0);
        assert!((width("A", 10.0) - 6.67).abs() < 0.001);
        assert!((width("il", 10.0) - 4.44).abs() < 0.001);
        assert!((width("\u{2014}", 12.0) - 12.0).abs() < 0.001);
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        let long = "https://fem.encar.com/cars/detail/39509415?carid=39509415";
        let fitted = fit(long, 9.0, 80.0);
        assert!(fitted.ends_with("..."));
        assert!(width(&fitted, 9.0) <= 80.0);

        assert_eq!(fit("RX", 9.0, 80.0), "RX");
        assert_eq!(fit("anything", 9.0, 1.0), "");
    }

    #[test]
    fn encodes_win_ansi() {
        assert_eq!(encode_win_ansi("Kia"), b"Kia".to_vec());
        assert_eq!(encode_win_ansi("a\u{2014}b"), vec![b'a', 0x97, b'b']);
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("쏘나타"), b"???".to_vec());
    }
}

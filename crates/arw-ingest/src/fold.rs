/// Replace Czech (and common Slovak) diacritics with their ASCII base letter.
///
/// Used for output headers, so `IČO` is written as `ICO`. Characters without
/// a mapping pass through unchanged.
pub fn ascii_fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'ä' => 'a',
        'Á' | 'Ä' => 'A',
        'č' => 'c',
        'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'é' | 'ě' => 'e',
        'É' | 'Ě' => 'E',
        'í' => 'i',
        'Í' => 'I',
        'ľ' | 'ĺ' => 'l',
        'Ľ' | 'Ĺ' => 'L',
        'ň' => 'n',
        'Ň' => 'N',
        'ó' | 'ô' => 'o',
        'Ó' | 'Ô' => 'O',
        'ř' | 'ŕ' => 'r',
        'Ř' | 'Ŕ' => 'R',
        'š' => 's',
        'Š' => 'S',
        'ť' => 't',
        'Ť' => 'T',
        'ú' | 'ů' => 'u',
        'Ú' | 'Ů' => 'U',
        'ý' => 'y',
        'Ý' => 'Y',
        'ž' => 'z',
        'Ž' => 'Z',
        other => other,
    }
}

use std::collections::HashMap;
use std::sync::OnceLock;

// Hepburn-style romanization tables. Kept as plain data so the scan below
// stays a table lookup rather than per-syllable dispatch logic.

/// Palatalized (yōon) kana pairs, hiragana then katakana rows.
static DIGRAPHS: &[(&str, &str)] = &[
    ("きゃ", "kya"),
    ("きゅ", "kyu"),
    ("きょ", "kyo"),
    ("ぎゃ", "gya"),
    ("ぎゅ", "gyu"),
    ("ぎょ", "gyo"),
    ("しゃ", "sha"),
    ("しゅ", "shu"),
    ("しょ", "sho"),
    ("じゃ", "ja"),
    ("じゅ", "ju"),
    ("じょ", "jo"),
    ("ちゃ", "cha"),
    ("ちゅ", "chu"),
    ("ちょ", "cho"),
    ("にゃ", "nya"),
    ("にゅ", "nyu"),
    ("にょ", "nyo"),
    ("ひゃ", "hya"),
    ("ひゅ", "hyu"),
    ("ひょ", "hyo"),
    ("びゃ", "bya"),
    ("びゅ", "byu"),
    ("びょ", "byo"),
    ("ぴゃ", "pya"),
    ("ぴゅ", "pyu"),
    ("ぴょ", "pyo"),
    ("みゃ", "mya"),
    ("みゅ", "myu"),
    ("みょ", "myo"),
    ("りゃ", "rya"),
    ("りゅ", "ryu"),
    ("りょ", "ryo"),
    ("キャ", "kya"),
    ("キュ", "kyu"),
    ("キョ", "kyo"),
    ("ギャ", "gya"),
    ("ギュ", "gyu"),
    ("ギョ", "gyo"),
    ("シャ", "sha"),
    ("シュ", "shu"),
    ("ショ", "sho"),
    ("ジャ", "ja"),
    ("ジュ", "ju"),
    ("ジョ", "jo"),
    ("チャ", "cha"),
    ("チュ", "chu"),
    ("チョ", "cho"),
    ("ニャ", "nya"),
    ("ニュ", "nyu"),
    ("ニョ", "nyo"),
    ("ヒャ", "hya"),
    ("ヒュ", "hyu"),
    ("ヒョ", "hyo"),
    ("ビャ", "bya"),
    ("ビュ", "byu"),
    ("ビョ", "byo"),
    ("ピャ", "pya"),
    ("ピュ", "pyu"),
    ("ピョ", "pyo"),
    ("ミャ", "mya"),
    ("ミュ", "myu"),
    ("ミョ", "myo"),
    ("リャ", "rya"),
    ("リュ", "ryu"),
    ("リョ", "ryo"),
];

/// Single-kana syllables, gojūon plus voiced/semi-voiced rows, both scripts.
static SYLLABLES: &[(char, &str)] = &[
    ('あ', "a"),
    ('い', "i"),
    ('う', "u"),
    ('え', "e"),
    ('お', "o"),
    ('ア', "a"),
    ('イ', "i"),
    ('ウ', "u"),
    ('エ', "e"),
    ('オ', "o"),
    ('か', "ka"),
    ('き', "ki"),
    ('く', "ku"),
    ('け', "ke"),
    ('こ', "ko"),
    ('カ', "ka"),
    ('キ', "ki"),
    ('ク', "ku"),
    ('ケ', "ke"),
    ('コ', "ko"),
    ('さ', "sa"),
    ('し', "shi"),
    ('す', "su"),
    ('せ', "se"),
    ('そ', "so"),
    ('サ', "sa"),
    ('シ', "shi"),
    ('ス', "su"),
    ('セ', "se"),
    ('ソ', "so"),
    ('た', "ta"),
    ('ち', "chi"),
    ('つ', "tsu"),
    ('て', "te"),
    ('と', "to"),
    ('タ', "ta"),
    ('チ', "chi"),
    ('ツ', "tsu"),
    ('テ', "te"),
    ('ト', "to"),
    ('な', "na"),
    ('に', "ni"),
    ('ぬ', "nu"),
    ('ね', "ne"),
    ('の', "no"),
    ('ナ', "na"),
    ('ニ', "ni"),
    ('ヌ', "nu"),
    ('ネ', "ne"),
    ('ノ', "no"),
    ('は', "ha"),
    ('ひ', "hi"),
    ('ふ', "fu"),
    ('へ', "he"),
    ('ほ', "ho"),
    ('ハ', "ha"),
    ('ヒ', "hi"),
    ('フ', "fu"),
    ('ヘ', "he"),
    ('ホ', "ho"),
    ('ま', "ma"),
    ('み', "mi"),
    ('む', "mu"),
    ('め', "me"),
    ('も', "mo"),
    ('マ', "ma"),
    ('ミ', "mi"),
    ('ム', "mu"),
    ('メ', "me"),
    ('モ', "mo"),
    ('や', "ya"),
    ('ゆ', "yu"),
    ('よ', "yo"),
    ('ヤ', "ya"),
    ('ユ', "yu"),
    ('ヨ', "yo"),
    ('ら', "ra"),
    ('り', "ri"),
    ('る', "ru"),
    ('れ', "re"),
    ('ろ', "ro"),
    ('ラ', "ra"),
    ('リ', "ri"),
    ('ル', "ru"),
    ('レ', "re"),
    ('ロ', "ro"),
    ('わ', "wa"),
    ('を', "o"),
    ('ん', "n"),
    ('ワ', "wa"),
    ('ヲ', "o"),
    ('ン', "n"),
    ('が', "ga"),
    ('ぎ', "gi"),
    ('ぐ', "gu"),
    ('げ', "ge"),
    ('ご', "go"),
    ('ガ', "ga"),
    ('ギ', "gi"),
    ('グ', "gu"),
    ('ゲ', "ge"),
    ('ゴ', "go"),
    ('ざ', "za"),
    ('じ', "ji"),
    ('ず', "zu"),
    ('ぜ', "ze"),
    ('ぞ', "zo"),
    ('ザ', "za"),
    ('ジ', "ji"),
    ('ズ', "zu"),
    ('ゼ', "ze"),
    ('ゾ', "zo"),
    ('だ', "da"),
    ('ぢ', "ji"),
    ('づ', "zu"),
    ('で', "de"),
    ('ど', "do"),
    ('ダ', "da"),
    ('ヂ', "ji"),
    ('ヅ', "zu"),
    ('デ', "de"),
    ('ド', "do"),
    ('ば', "ba"),
    ('び', "bi"),
    ('ぶ', "bu"),
    ('べ', "be"),
    ('ぼ', "bo"),
    ('バ', "ba"),
    ('ビ', "bi"),
    ('ブ', "bu"),
    ('ベ', "be"),
    ('ボ', "bo"),
    ('ぱ', "pa"),
    ('ぴ', "pi"),
    ('ぷ', "pu"),
    ('ぺ', "pe"),
    ('ぽ', "po"),
    ('パ', "pa"),
    ('ピ', "pi"),
    ('プ', "pu"),
    ('ペ', "pe"),
    ('ポ', "po"),
    ('ゔ', "vu"),
    ('ヴ', "vu"),
];

/// Sokuon: the following consonant sound is doubled.
const SOKUON: [char; 2] = ['っ', 'ッ'];

/// Chōon: the preceding vowel sound is lengthened.
const CHOON: char = 'ー';

fn digraph_map() -> &'static HashMap<(char, char), &'static str> {
    static MAP: OnceLock<HashMap<(char, char), &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        DIGRAPHS
            .iter()
            .map(|&(pair, romaji)| {
                let mut chars = pair.chars();
                let first = chars.next().expect("digraph key is two kana");
                let second = chars.next().expect("digraph key is two kana");
                ((first, second), romaji)
            })
            .collect()
    })
}

fn syllable_map() -> &'static HashMap<char, &'static str> {
    static MAP: OnceLock<HashMap<char, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| SYLLABLES.iter().copied().collect())
}

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309f}' | '\u{30a0}'..='\u{30ff}')
}

pub fn contains_kana(s: &str) -> bool {
    s.chars().any(is_kana)
}

/// Build the string the player's keystrokes must match. Words without kana
/// (and everything when romaji input is off) pass through unchanged.
pub fn to_typing_target(word: &str, romaji_input: bool) -> String {
    if !romaji_input || !contains_kana(word) {
        return word.to_string();
    }
    romanize(word)
}

/// Single left-to-right scan: digraphs first, then sokuon lookahead, chōon
/// vowel repetition, plain syllables, and finally unmapped passthrough.
pub fn romanize(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(&next) = chars.get(i + 1) {
            if let Some(&romaji) = digraph_map().get(&(c, next)) {
                out.push_str(romaji);
                i += 2;
                continue;
            }
        }

        if SOKUON.contains(&c) {
            // Double the leading consonant of whatever syllable follows.
            // The follower itself is not consumed here; a trailing sokuon
            // with nothing mappable after it emits nothing.
            let doubled = chars.get(i + 1).and_then(|&next| {
                chars
                    .get(i + 2)
                    .and_then(|&after| digraph_map().get(&(next, after)))
                    .or_else(|| syllable_map().get(&next))
                    .and_then(|romaji| romaji.chars().next())
            });
            if let Some(consonant) = doubled {
                out.push(consonant);
            }
            i += 1;
            continue;
        }

        if c == CHOON {
            if let Some(last) = out.chars().last() {
                if "aiueo".contains(last) {
                    out.push(last);
                }
            }
            i += 1;
            continue;
        }

        match syllable_map().get(&c) {
            Some(&romaji) => out.push_str(romaji),
            None => out.push(c),
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_when_disabled() {
        assert_eq!(to_typing_target("ねこ", false), "ねこ");
    }

    #[test]
    fn test_passthrough_without_kana() {
        assert_eq!(to_typing_target("hello", true), "hello");
        assert_eq!(to_typing_target("漢字", true), "漢字");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_typing_target("", true), "");
    }

    #[test]
    fn test_plain_syllables() {
        assert_eq!(to_typing_target("ねこ", true), "neko");
        assert_eq!(to_typing_target("さかな", true), "sakana");
        assert_eq!(to_typing_target("し", true), "shi");
        assert_eq!(to_typing_target("つ", true), "tsu");
    }

    #[test]
    fn test_katakana_syllables() {
        assert_eq!(to_typing_target("テスト", true), "tesuto");
        assert_eq!(to_typing_target("カメラ", true), "kamera");
    }

    #[test]
    fn test_digraph_table_entries() {
        assert_eq!(to_typing_target("きゃ", true), "kya");
        assert_eq!(to_typing_target("しゅ", true), "shu");
        assert_eq!(to_typing_target("ちょ", true), "cho");
        assert_eq!(to_typing_target("じゃ", true), "ja");
        assert_eq!(to_typing_target("リョ", true), "ryo");
        assert_eq!(to_typing_target("きょう", true), "kyou");
    }

    #[test]
    fn test_sokuon_doubles_following_syllable() {
        assert_eq!(to_typing_target("がっこう", true), "gakkou");
        assert_eq!(to_typing_target("きって", true), "kitte");
        assert_eq!(to_typing_target("ざっし", true), "zasshi");
    }

    #[test]
    fn test_sokuon_doubles_following_digraph() {
        // marker + きゃ-class digraph yields the digraph's leading consonant
        assert_eq!(to_typing_target("っきゃ", true), "kkya");
        assert_eq!(to_typing_target("ほっちゃ", true), "hoccha");
    }

    #[test]
    fn test_katakana_sokuon() {
        assert_eq!(to_typing_target("カップ", true), "kappu");
    }

    #[test]
    fn test_trailing_sokuon_emits_nothing() {
        assert_eq!(to_typing_target("あっ", true), "a");
        assert_eq!(to_typing_target("っ", true), "");
    }

    #[test]
    fn test_choon_repeats_previous_vowel() {
        assert_eq!(to_typing_target("ラーメン", true), "raamen");
        assert_eq!(to_typing_target("コーヒー", true), "koohii");
        assert_eq!(to_typing_target("スーパー", true), "suupaa");
    }

    #[test]
    fn test_choon_at_start_emits_nothing() {
        assert_eq!(to_typing_target("ーあ", true), "a");
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        // kanji between kana is emitted verbatim
        assert_eq!(to_typing_target("お茶", true), "o茶");
    }

    #[test]
    fn test_voiced_and_semivoiced_rows() {
        assert_eq!(to_typing_target("でんわ", true), "denwa");
        assert_eq!(to_typing_target("ぱん", true), "pan");
        assert_eq!(to_typing_target("ゔ", true), "vu");
    }

    #[test]
    fn test_wo_and_n() {
        assert_eq!(to_typing_target("を", true), "o");
        assert_eq!(to_typing_target("ン", true), "n");
    }

    #[test]
    fn test_idempotent_on_own_output() {
        for word in ["がっこう", "きょう", "ラーメン", "ねこ"] {
            let once = to_typing_target(word, true);
            let twice = to_typing_target(&once, true);
            assert_eq!(once, twice, "romanizing {word} twice must be stable");
        }
    }

    #[test]
    fn test_mapped_words_produce_output() {
        for word in ["ねこ", "いぬ", "がっこう", "きょう", "ジュース"] {
            assert!(!to_typing_target(word, true).is_empty());
        }
    }
}

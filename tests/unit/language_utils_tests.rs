/*!
 * Tests for language code utilities
 */

use clipcut::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1_or_part2t, validate_language_code,
};

#[test]
fn test_validate_withTwoAndThreeLetterCodes_shouldAccept() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("FRA").is_ok());
    assert!(validate_language_code("ger").is_ok());
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_normalize_withThreeLetterCode_shouldPreferTwoLetters() {
    assert_eq!(normalize_to_part1_or_part2t("fra").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part2t(" EN ").unwrap(), "en");
}

#[test]
fn test_languageCodesMatch_acrossFormats_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fre", "fr"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "??"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert!(get_language_name("abcd").is_err());
}

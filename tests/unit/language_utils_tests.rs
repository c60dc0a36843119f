/*!
 * Tests for language utility functions
 */

use promptbridge::language_utils::{
    LanguageCodeType, get_language_name, language_codes_match, normalize_to_part1_or_part2t,
    normalize_to_part2t, validate_language_code,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    // ISO 639-1 tests
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("ja").unwrap(), LanguageCodeType::Part1));

    // ISO 639-2/T tests
    assert!(matches!(validate_language_code("eng").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("deu").unwrap(), LanguageCodeType::Part2T));

    // ISO 639-2/B tests
    assert!(matches!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B));
    assert!(matches!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B));

    // Whitespace and case tests
    assert!(matches!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1));

    // Invalid codes
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("FRE").unwrap(), "fra");
    assert_eq!(normalize_to_part2t(" en ").unwrap(), "eng");
}

/// Test normalization to the shortest available form
#[test]
fn test_normalize_to_part1_or_part2t_withValidCodes_shouldPreferTwoLetters() {
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part2t("ES").unwrap(), "es");
    assert!(normalize_to_part1_or_part2t("not-a-code").is_err());
}

/// Test matching of different language code formats
#[test]
fn test_language_codes_match_withMatchingCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("fra", "fre"));
    assert!(language_codes_match("EN", "ENG"));

    // Non-matches
    assert!(!language_codes_match("en", "fra"));
    assert!(!language_codes_match("en", "123"));
}

/// Test retrieval of language names from codes
#[test]
fn test_get_language_name_withValidCodes_shouldReturnCorrectName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("eng").unwrap(), "English");
    assert_eq!(get_language_name("fre").unwrap(), "French");
    assert!(get_language_name("123").is_err());
}

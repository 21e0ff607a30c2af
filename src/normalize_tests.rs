use super::{CoreMatch, SchemaNormalizer};
use crate::synonyms::{SynonymConfig, SynonymGroups, SynonymTable};

fn normalizer() -> SchemaNormalizer {
    SchemaNormalizer::new(SynonymTable::default()).expect("build normalizer")
}

#[test]
fn normalization_is_deterministic() {
    let normalizer = normalizer();
    for id in ["ADMDEV", "USER_UAT", "NONEXISTENT_CORE", "", "app-v1"] {
        assert_eq!(normalizer.normalize(id), normalizer.normalize(id), "{id}");
    }
}

#[test]
fn case_and_delimiters_do_not_change_the_bucket() {
    let normalizer = normalizer();
    let expected = normalizer.normalize("ADM_PRD");
    assert_eq!(expected, "admin_prod");
    assert_eq!(normalizer.normalize("adm-prd"), expected);
    assert_eq!(normalizer.normalize("admprd"), expected);
    assert_eq!(normalizer.normalize("Adm,Prd"), expected);
}

#[test]
fn every_environment_collapses_to_prod() {
    let normalizer = normalizer();
    for id in ["ADMDEV", "ADMPRD", "ADM", "ADMIN_UAT", "adm-tst", "DEV_ADM"] {
        assert_eq!(normalizer.normalize(id), "admin_prod", "{id}");
    }
    for id in ["USER_PROD", "USER_UAT", "usr-develop"] {
        assert_eq!(normalizer.normalize(id), "user_prod", "{id}");
    }
}

#[test]
fn unknown_core_falls_back_to_alphanumeric_lowercase() {
    let normalizer = normalizer();
    assert_eq!(normalizer.normalize("XYZ_TEST"), "xyztest");
    assert_eq!(normalizer.normalize("APP_V1"), "appv1");
    assert_eq!(normalizer.normalize("NONEXISTENT_CORE"), "nonexistentcore");
    assert_eq!(normalizer.normalize("Billing.Db #2"), "billingdb2");
}

#[test]
fn empty_fallbacks_are_equal() {
    let normalizer = normalizer();
    assert_eq!(normalizer.normalize(""), "");
    assert_eq!(normalizer.normalize("--__,,"), "");
    assert_eq!(normalizer.normalize("***"), normalizer.normalize(""));
}

#[test]
fn classify_reports_part_matches_and_detected_environment() {
    let normalizer = normalizer();

    let user_uat = normalizer.classify("USER_UAT");
    assert_eq!(user_uat.core.as_deref(), Some("user"));
    assert_eq!(user_uat.env.as_deref(), Some("uat"));
    assert_eq!(user_uat.core_match, CoreMatch::Part);
    assert_eq!(user_uat.canonical, "user_prod");

    let dev_adm = normalizer.classify("DEV_ADM");
    assert_eq!(dev_adm.core.as_deref(), Some("admin"));
    assert_eq!(dev_adm.env.as_deref(), Some("dev"));
    assert_eq!(dev_adm.core_match, CoreMatch::Part);
}

#[test]
fn classify_falls_back_to_substrings() {
    let normalizer = normalizer();

    let admdev = normalizer.classify("ADMDEV");
    assert_eq!(admdev.core.as_deref(), Some("admin"));
    assert_eq!(admdev.env.as_deref(), Some("dev"));
    assert_eq!(admdev.core_match, CoreMatch::Substring);

    let adminprd = normalizer.classify("ADMINPRD");
    assert_eq!(adminprd.core.as_deref(), Some("admin"));
    assert_eq!(adminprd.env.as_deref(), Some("prod"));

    let fallback = normalizer.classify("XYZ_TEST");
    assert_eq!(fallback.core, None);
    assert_eq!(fallback.env.as_deref(), Some("test"));
    assert_eq!(fallback.core_match, CoreMatch::Unmatched);
}

#[test]
fn empty_part_means_production_but_substring_search_skips_it() {
    let normalizer = normalizer();
    assert_eq!(normalizer.classify("ADM_").env.as_deref(), Some("prod"));
    assert_eq!(normalizer.classify("ADM").env, None);
}

#[test]
fn longest_variation_wins_and_ties_keep_declaration_order() {
    let normalizer = normalizer();
    assert_eq!(normalizer.classify("usrdevelop").env.as_deref(), Some("dev"));
    assert_eq!(normalizer.classify("ADMINISTRATOR").core.as_deref(), Some("admin"));
    // "adm" and "usr" share a length; admin is declared before user.
    assert_eq!(normalizer.normalize("usradm"), "admin_prod");
    // "prd" is declared before "dev", so it is found first.
    assert_eq!(normalizer.classify("ADMPRDDEV").env.as_deref(), Some("prod"));
}

#[test]
fn equal_length_ties_follow_table_order_not_spelling() {
    let config = SynonymConfig {
        schema_version: 1,
        core_synonyms: SynonymGroups::from(vec![
            ("zeta".to_string(), vec!["zz".to_string()]),
            ("alpha".to_string(), vec!["aa".to_string()]),
        ]),
        env_synonyms: SynonymGroups::from(vec![("prod".to_string(), vec![String::new()])]),
    };
    let normalizer =
        SchemaNormalizer::new(SynonymTable::from_config(&config)).expect("build normalizer");
    assert_eq!(normalizer.normalize("AAZZ"), "zeta_prod");
}

#[test]
fn env_search_strips_core_name_as_plain_text() {
    let normalizer = normalizer();
    // Removing "admin" leaves "prod" behind.
    let classified = normalizer.classify("adminprod");
    assert_eq!(classified.env.as_deref(), Some("prod"));
    // Nothing remains after removal, so the full string is searched.
    assert_eq!(normalizer.classify("admin").env, None);
}

#[test]
fn custom_tables_drive_matching() {
    let config = SynonymConfig {
        schema_version: 1,
        core_synonyms: SynonymGroups::from(vec![(
            "billing".to_string(),
            vec!["billing".to_string(), "bill".to_string()],
        )]),
        env_synonyms: SynonymGroups::from(vec![(
            "prod".to_string(),
            vec!["prod".to_string(), String::new()],
        )]),
    };
    let normalizer =
        SchemaNormalizer::new(SynonymTable::from_config(&config)).expect("build normalizer");
    assert_eq!(normalizer.normalize("BILL_QA"), "billing_prod");
    assert_eq!(normalizer.normalize("ADMPRD"), "admprd");
}

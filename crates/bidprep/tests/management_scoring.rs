use bidprep::registry::CompanyEntry;
use bidprep::scoring::{
    ChosenMethod, IndustryAverage, IndustryAverages, IndustryKind, ManagementScorer, RuleBook,
    MAX_MANAGEMENT_SCORE,
};
use std::fs;

const MOIS_RULES: &str = r#"{
  "agencies": [
    {
      "id": "MOIS",
      "name": "행정안전부",
      "tiers": [
        {
          "minAmount": 0,
          "maxAmount": 3000000000,
          "rules": {
            "management": {
              "methodSelection": "max",
              "rounding": {"method": "truncate", "digits": 2},
              "methods": [
                {
                  "id": "composite",
                  "components": {
                    "debtRatio": {"thresholds": [
                      {"lt": 0.5, "score": 8}, {"lt": 0.75, "score": 7.2},
                      {"lt": 1.0, "score": 6.4}, {"lt": 1.25, "score": 5.6},
                      {"gte": 1.25, "score": 4.8}
                    ]},
                    "currentRatio": {"thresholds": [
                      {"gte": 1.5, "score": 7}, {"gte": 1.2, "score": 6.3},
                      {"gte": 1.0, "score": 5.6}, {"gte": 0.7, "score": 4.9},
                      {"lt": 0.7, "score": 4.2}
                    ]}
                  }
                },
                {
                  "id": "credit",
                  "gradeTable": [
                    {"grade": "AAA", "score": 15}, {"grade": "AA+", "score": 15},
                    {"grade": "BBB+", "score": 15}, {"grade": "BBB0", "score": 15},
                    {"grade": "BB+", "score": 14}, {"grade": "B", "score": 12}
                  ]
                },
                {"id": "experience"}
              ]
            }
          }
        },
        {
          "minAmount": 3000000000,
          "maxAmount": null,
          "rules": {
            "management": {
              "methodSelection": "sum",
              "rounding": {"method": "truncate", "digits": 2},
              "methods": [
                {"id": "composite", "components": {
                  "debtRatio": {"thresholds": [{"lt": 0.5, "score": 8}, {"lt": 0.75, "score": 7.2}]},
                  "currentRatio": {"thresholds": [{"gte": 1.5, "score": 7}]}
                }},
                {"id": "credit", "gradeTable": [{"grade": "BBB+", "score": 15}]}
              ]
            }
          }
        }
      ]
    },
    {"id": "LH", "tiers": [{"minAmount": 0, "rules": {}}]}
  ]
}"#;

fn scorer() -> ManagementScorer {
    ManagementScorer::new(RuleBook::from_json_str(MOIS_RULES).expect("rules parse"))
}

fn averages() -> IndustryAverages {
    IndustryAverages::new().with(
        IndustryKind::Eung.file_type(),
        IndustryAverage {
            debt_ratio: Some(100.0),
            current_ratio: Some(120.0),
        },
    )
}

fn company(credit_grade: &str) -> CompanyEntry {
    let mut entry = CompanyEntry::blank("(주)대한건설", "서울");
    entry.debt_ratio = Some(50.0);
    entry.current_ratio = Some(180.0);
    entry.credit_grade = credit_grade.to_string();
    entry.finish()
}

#[test]
fn credit_wins_under_max_selection() {
    let assessment = scorer().assess(
        &company("BBB+"),
        "MOIS",
        2_000_000_000.0,
        &averages(),
        "eung",
    );

    let composite = assessment.composite.as_ref().expect("composite scored");
    assert!((composite.total - 14.2).abs() < 1e-9);
    assert_eq!(assessment.credit.as_ref().map(|credit| credit.score), Some(15.0));
    assert_eq!(assessment.chosen, Some(ChosenMethod::Credit));
    assert_eq!(assessment.score, Some(15.0));
    assert!(!assessment.tier_fallback);
}

#[test]
fn composite_alone_is_truncated() {
    let score = scorer().score_management(
        &company(""),
        "mois",
        2_000_000_000.0,
        &averages(),
        "eung",
    );
    assert_eq!(score, Some(14.2));
}

#[test]
fn sum_selection_is_clamped() {
    let assessment = scorer().assess(
        &company("bbb+"),
        "MOIS",
        5_000_000_000.0,
        &averages(),
        "eung",
    );

    assert_eq!(assessment.chosen, Some(ChosenMethod::Sum));
    assert_eq!(assessment.score, Some(MAX_MANAGEMENT_SCORE));
    assert_eq!(
        assessment.tier.as_ref().map(|tier| tier.min_amount),
        Some(3_000_000_000.0)
    );
}

#[test]
fn a_malformed_agency_does_not_block_the_others() {
    let rules = r#"{
      "agencies": [
        {"id": "MOIS", "tiers": [{"minAmount": 0, "rules": {"management": {"methods": [
          {"id": "composite", "components": {
            "debtRatio": {"thresholds": [{"lt": 0.75, "score": 7.2}]}
          }}
        ]}}}]},
        {"id": "PPS", "tiers": [{"minAmount": 0, "rules": {"management": {"methods": [
          {"id": "composite", "components": {
            "debtRatio": {"thresholds": [{"gte": 0.25, "lt": 0.75, "score": 6.5}]},
            "currentRatio": {"thresholds": [{"gt": 1.0, "lt": 2.0, "score": 9}]}
          }}
        ]}}}]}
      ]
    }"#;
    let scorer = ManagementScorer::new(RuleBook::from_json_str(rules).expect("rules parse"));

    let mois = scorer.score_management(&company(""), "MOIS", 1_000_000.0, &averages(), "eung");
    assert_eq!(mois, Some(7.2));

    let pps = scorer.assess(&company(""), "PPS", 1_000_000.0, &averages(), "eung");
    let composite = pps.composite.as_ref().expect("band threshold scored");
    let current = composite
        .components
        .iter()
        .find(|component| component.field == "currentRatio")
        .expect("current ratio listed");
    assert_eq!(current.score, None);
    assert_eq!(pps.score, Some(6.5));
}

#[test]
fn missing_industry_average_falls_back_to_credit_only() {
    let assessment = scorer().assess(
        &company("BB+"),
        "MOIS",
        2_000_000_000.0,
        &averages(),
        "sobang",
    );

    assert!(assessment.composite.is_none());
    assert_eq!(assessment.chosen, Some(ChosenMethod::Credit));
    assert_eq!(assessment.score, Some(14.0));
}

#[test]
fn nothing_to_score_yields_none() {
    let scorer = scorer();
    let unrated = CompanyEntry::blank("무자료건설", "서울").finish();

    assert_eq!(
        scorer.score_management(&unrated, "MOIS", 2_000_000_000.0, &averages(), "eung"),
        None
    );
    assert_eq!(
        scorer.score_management(&company("BBB+"), "KEPCO", 2_000_000_000.0, &averages(), "eung"),
        None
    );
    assert_eq!(
        scorer.score_management(&company("BBB+"), "LH", 2_000_000_000.0, &averages(), "eung"),
        None
    );
}

#[test]
fn scores_stay_within_bounds_across_inputs() {
    let scorer = scorer();
    let grades = ["AAA", "BBB0", "B", "CCC", ""];
    let ratios = [0.0, 10.0, 75.0, 130.0, 400.0];

    for grade in grades {
        for debt in ratios {
            for current in ratios {
                let mut entry = company(grade);
                entry.debt_ratio = Some(debt);
                entry.current_ratio = Some(current);

                for amount in [-1.0, 0.0, 2_999_999_999.0, 3e9, f64::NAN] {
                    if let Some(score) =
                        scorer.score_management(&entry, "MOIS", amount, &averages(), "eung")
                    {
                        assert!((0.0..=MAX_MANAGEMENT_SCORE).contains(&score), "{score}");
                    }
                }
            }
        }
    }
}

#[test]
fn rule_book_loads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("formulas.json");
    fs::write(&path, MOIS_RULES).expect("write rules");

    let book = RuleBook::from_path(&path).expect("rules load");
    assert!(book.agency(" mois ").is_some());
    assert_eq!(
        book.agencies().iter().map(|agency| agency.id.as_str()).collect::<Vec<_>>(),
        vec!["MOIS", "LH"]
    );
}

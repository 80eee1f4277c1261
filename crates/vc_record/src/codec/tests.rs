use alloc::boxed::Box;
use alloc::collections::LinkedList;
use alloc::sync::Arc;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::derive::Record;
use crate::filter::{FilterPolicy, NestedAdmission};
use crate::format::MAX_DEPTH;
use crate::info::Typed;
use crate::registry::TypeRegistry;
use crate::strategy::{PatternRules, StrategyKind};
use crate::{Codec, EncodeError, Error, FieldError, FieldValue, LazyRecord, MalformedKind};
use crate::{MaterializeError, Reflect};

// -----------------------------------------------------------------------------
// Pharmacy benefit model

#[derive(Record, Debug, Clone, Copy, PartialEq, Eq)]
enum ClaimOrigination {
    Electronic,
    Manual,
    Batch,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct CostShareStep {
    #[record(identity)]
    step_id: i32,
    order: u8,
    description: String,
    copay: f64,
    coinsurance_percent: Option<f64>,
    system_begin: DateTime<Utc>,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct CoverageTier {
    tier_id: i32,
    description: String,
    effective: NaiveDate,
    end: Option<NaiveDate>,
    steps: LinkedList<CostShareStep>,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct DaysSupply {
    days_supply_id: u32,
    minimum: f64,
    maximum: f64,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Coverage {
    coverage_id: i64,
    name: String,
    days_supply: Box<DaysSupply>,
    tiers: Vec<CoverageTier>,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct NpiValidation {
    origination: ClaimOrigination,
    from: NaiveDate,
    status: String,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(type_path = "pharmacy::BenefitPlan")]
struct BenefitPlan {
    #[record(identity)]
    plan_id: u64,
    plan_code: String,
    coverage: Vec<Coverage>,
    validations: Vec<NpiValidation>,
    #[record(default)]
    processing_window: u16,
    #[record(skip)]
    cached_hash: u64,
}

fn instant(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 15, 0).unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn step(step_id: i32, order: u8) -> CostShareStep {
    CostShareStep {
        step_id,
        order,
        description: format!("step {order}"),
        copay: 4.5,
        coinsurance_percent: (order % 2 == 0).then_some(0.2),
        system_begin: instant(u32::from(order)),
    }
}

fn plan() -> BenefitPlan {
    let tier = CoverageTier {
        tier_id: 1,
        description: "generic".into(),
        effective: date(1),
        end: None,
        steps: [step(12, 2), step(3, 1), step(7, 3)].into_iter().collect(),
    };
    BenefitPlan {
        plan_id: 10,
        plan_code: "PB-10".into(),
        coverage: vec![Coverage {
            coverage_id: 1,
            name: "retail".into(),
            days_supply: Box::new(DaysSupply {
                days_supply_id: 45,
                minimum: 3.0,
                maximum: 4.7,
            }),
            tiers: vec![tier.clone(), CoverageTier { tier_id: 2, end: Some(date(30)), ..tier }],
        }],
        validations: vec![NpiValidation {
            origination: ClaimOrigination::Batch,
            from: date(2),
            status: "status".into(),
        }],
        processing_window: 5,
        cached_hash: 0,
    }
}

fn plan_policy() -> FilterPolicy {
    FilterPolicy::new()
        .allow::<BenefitPlan>()
        .allow::<Coverage>()
        .allow::<CoverageTier>()
        .allow::<CostShareStep>()
        .allow::<DaysSupply>()
        .allow::<NpiValidation>()
        .allow::<ClaimOrigination>()
}

fn descriptor_codec() -> Codec {
    Codec::builder()
        .registry(Arc::new(TypeRegistry::new()))
        .policy(plan_policy())
        .build()
}

fn pattern_codec() -> Codec {
    Codec::pattern_matching(FilterPolicy::new(), PatternRules::new())
}

// -----------------------------------------------------------------------------
// Round trips

#[test]
fn nested_graph_round_trips_under_both_strategies() {
    let original = plan();
    for codec in [descriptor_codec(), pattern_codec()] {
        let bytes = codec.encode(&original).unwrap();
        let back: BenefitPlan = codec.read(bytes).unwrap();
        assert_eq!(back, original, "{:?}", codec.strategy());
    }
}

#[test]
fn skipped_fields_are_not_encoded() {
    let codec = descriptor_codec();
    let mut original = plan();
    original.cached_hash = 99;

    let view = codec.decode(codec.encode(&original).unwrap()).unwrap();
    assert!(!view.has_field("cached_hash"));
    assert_eq!(view.type_path(), "pharmacy::BenefitPlan");

    let back: BenefitPlan = codec.materialize(&view).unwrap();
    assert_eq!(back.cached_hash, 0);
}

#[test]
fn collection_order_is_preserved() {
    let codec = descriptor_codec();
    let view = codec.decode(codec.encode(&plan()).unwrap()).unwrap();

    let coverage = view.field("coverage").unwrap();
    let coverage = coverage.as_list().unwrap().get(0).unwrap();
    let tiers = coverage.as_record().unwrap().field("tiers").unwrap();
    let tier = tiers.as_list().unwrap().get(0).unwrap();
    let steps = tier.as_record().unwrap().field("steps").unwrap();

    let ids: Vec<_> = steps
        .as_list()
        .unwrap()
        .iter()
        .map(|step| {
            let step = step.unwrap();
            step.as_record().unwrap().field("step_id").unwrap().as_i64().unwrap()
        })
        .collect();
    assert_eq!(ids, [12, 3, 7]);
}

// -----------------------------------------------------------------------------
// Lazy view

#[test]
fn lazy_fields_agree_with_materialized_values() {
    let codec = descriptor_codec();
    let original = plan();
    let view = codec.decode(codec.encode(&original).unwrap()).unwrap();
    let step = original.coverage[0].tiers[0].steps.front().unwrap();

    assert_eq!(view.field("plan_id").unwrap().as_u64(), Some(original.plan_id));
    assert_eq!(view.field("plan_code").unwrap().as_str(), Some("PB-10"));
    assert_eq!(view.field("processing_window").unwrap().as_u64(), Some(5));

    let validation = view.field("validations").unwrap();
    let validation = validation.as_list().unwrap().get(0).unwrap();
    let validation = validation.as_record().unwrap();
    assert_eq!(validation.field("origination").unwrap().as_enum().unwrap().variant(), "Batch");
    assert_eq!(
        validation.field("from").unwrap().as_temporal().unwrap().to_canonical(),
        "2024-03-02"
    );

    let coverage = view.field("coverage").unwrap();
    let coverage = coverage.as_list().unwrap().get(0).unwrap();
    let coverage = coverage.as_record().unwrap();
    let supply = coverage.field("days_supply").unwrap();
    assert_eq!(supply.as_record().unwrap().field("maximum").unwrap().as_f64(), Some(4.7));

    let tiers = coverage.field("tiers").unwrap();
    let tier = tiers.as_list().unwrap().get(0).unwrap();
    let tier = tier.as_record().unwrap();
    assert!(tier.field("end").unwrap().is_absent());

    let steps = tier.field("steps").unwrap();
    let first = steps.as_list().unwrap().get(0).unwrap();
    let first = first.as_record().unwrap();
    assert_eq!(first.field("copay").unwrap().as_f64(), Some(step.copay));
    assert_eq!(first.field("coinsurance_percent").unwrap().as_f64(), step.coinsurance_percent);
    assert_eq!(
        first.field("system_begin").unwrap().as_temporal().unwrap().to_canonical(),
        "2024-03-01T02:15:00Z"
    );
    assert_eq!(first.identity_fields().collect::<Vec<_>>(), ["step_id"]);

    // Nested views can be materialized on their own.
    let materialized: CostShareStep = codec.materialize(first).unwrap();
    assert_eq!(&materialized, step);
}

#[test]
fn unknown_fields_are_errors_not_defaults() {
    let codec = descriptor_codec();
    let view = codec.decode(codec.encode(&plan()).unwrap()).unwrap();
    assert_eq!(
        view.field("planCode"),
        Err(FieldError::Unknown {
            ty: "pharmacy::BenefitPlan".into(),
            field: "planCode".into(),
        })
    );
}

#[test]
fn json_view_of_a_record() {
    let codec = descriptor_codec();
    let validation = NpiValidation {
        origination: ClaimOrigination::Manual,
        from: date(9),
        status: "ok".into(),
    };
    let view = codec.decode(codec.encode(&validation).unwrap()).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "origination": "Manual", "from": "2024-03-09", "status": "ok" })
    );
}

// -----------------------------------------------------------------------------
// Scenario: id / tier / status

#[derive(Record, Debug, PartialEq)]
struct TierStep {
    step_id: i32,
}

#[derive(Record, Debug, PartialEq)]
struct Claim {
    id: i32,
    tier: Vec<TierStep>,
    status: ClaimOrigination,
}

#[test]
fn claim_scenario() {
    let claim = Claim {
        id: 12,
        tier: vec![TierStep { step_id: 12 }],
        status: ClaimOrigination::Batch,
    };

    for codec in [descriptor_codec_allowing_all(), pattern_codec()] {
        let view = codec.decode(codec.encode(&claim).unwrap()).unwrap();

        assert_eq!(view.field("status").unwrap().as_enum().unwrap().variant(), "Batch");
        let tier = view.field("tier").unwrap();
        let first = tier.as_list().unwrap().get(0).unwrap();
        assert_eq!(first.as_record().unwrap().field("step_id").unwrap(), FieldValue::Int(12));

        assert_eq!(codec.materialize::<Claim>(&view).unwrap(), claim);
    }
}

fn descriptor_codec_allowing_all() -> Codec {
    Codec::builder()
        .registry(Arc::new(TypeRegistry::new()))
        .policy(FilterPolicy::new().with_fallback(true))
        .build()
}

// -----------------------------------------------------------------------------
// Admission

#[derive(Record, Debug)]
struct PlanDao {
    plan: u64,
}

#[derive(Record, Debug)]
struct Envelope {
    dao: PlanDao,
}

#[test]
fn excluded_root_is_rejected() {
    let dao = PlanDao { plan: 1 };

    let codec = descriptor_codec();
    assert!(matches!(
        codec.encode(&dao),
        Err(EncodeError::Rejected { ty, .. }) if ty == PlanDao::type_identity().path()
    ));

    let codec = Codec::pattern_matching(FilterPolicy::new().exclude_pattern("*Dao"), PatternRules::new());
    assert!(matches!(codec.encode(&dao), Err(EncodeError::Rejected { .. })));
}

#[test]
fn nested_admission_modes() {
    let envelope = Envelope { dao: PlanDao { plan: 1 } };
    let policy = FilterPolicy::new().allow::<Envelope>();

    let enforce = Codec::builder().policy(policy.clone()).build();
    let err = enforce.encode(&envelope).unwrap_err();
    assert_eq!(
        err,
        EncodeError::Rejected {
            ty: PlanDao::type_identity().path(),
            path: "dao".into(),
        }
    );

    let inherit = Codec::builder()
        .policy(policy.clone())
        .nested_admission(NestedAdmission::Inherit)
        .build();
    let bytes = inherit.encode(&envelope).unwrap();

    // The same bytes are refused by the enforcing codec on the way back.
    let view = enforce.decode(bytes).unwrap();
    assert!(matches!(
        enforce.materialize::<Envelope>(&view),
        Err(MaterializeError::Rejected { path, .. }) if path == "dao"
    ));
    assert_eq!(inherit.materialize::<Envelope>(&view).unwrap().dao.plan, 1);

    // An explicit deny still wins for the root under `Inherit`.
    let denied = Codec::builder()
        .policy(policy.deny::<Envelope>())
        .nested_admission(NestedAdmission::Inherit)
        .build();
    assert!(matches!(denied.encode(&envelope), Err(EncodeError::Rejected { .. })));
}

#[test]
fn excluded_enum_is_rejected() {
    let validation = NpiValidation {
        origination: ClaimOrigination::Electronic,
        from: date(1),
        status: String::new(),
    };
    let codec = Codec::pattern_matching(
        FilterPolicy::new().deny::<ClaimOrigination>(),
        PatternRules::new(),
    );
    assert!(matches!(
        codec.encode(&validation),
        Err(EncodeError::Rejected { path, .. }) if path == "origination"
    ));
}

// -----------------------------------------------------------------------------
// Cycles

#[derive(Record)]
struct Left {
    name: String,
    right: Arc<Right>,
}

#[derive(Record)]
struct Right {
    left: OnceLock<Arc<Left>>,
}

#[test]
fn reference_cycle_is_reported() {
    let right = Arc::new(Right { left: OnceLock::new() });
    let left = Arc::new(Left {
        name: "a".into(),
        right: Arc::clone(&right),
    });
    assert!(right.left.set(Arc::clone(&left)).is_ok());

    for codec in [descriptor_codec_allowing_all(), pattern_codec()] {
        let err = codec.encode(&*left).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Cyclic {
                ty: Left::type_identity().path(),
                path: "right.left".into(),
            }
        );
    }
}

#[derive(Record, Debug, PartialEq)]
struct Link {
    hop: u32,
    next: Option<Box<Link>>,
}

fn chain(len: u32) -> Link {
    (1..len).fold(Link { hop: 0, next: None }, |next, hop| Link {
        hop,
        next: Some(Box::new(next)),
    })
}

#[test]
fn nesting_depth_matches_the_decoder() {
    for codec in [descriptor_codec_allowing_all(), pattern_codec()] {
        let deepest = chain(MAX_DEPTH as u32);
        let bytes = codec.encode(&deepest).unwrap();
        assert_eq!(codec.read::<Link>(bytes).unwrap(), deepest);

        let err = codec.encode(&chain(MAX_DEPTH as u32 + 72)).unwrap_err();
        assert!(
            matches!(err, EncodeError::TooDeep { limit: MAX_DEPTH, ref path } if path.starts_with("next.next")),
            "{err}"
        );
    }

    // Lists count as a level too.
    #[derive(Record)]
    struct Rows {
        rows: Vec<Vec<u8>>,
    }
    let rows = Rows { rows: vec![vec![1]] };
    assert!(pattern_codec().encode(&rows).is_ok());
}

#[test]
fn optional_of_optional_is_refused() {
    #[derive(Record, Debug)]
    struct Toggle {
        state: Option<Option<bool>>,
    }

    let toggle = Toggle { state: Some(None) };
    assert!(matches!(
        pattern_codec().encode(&toggle),
        Err(EncodeError::NestedOptional { ref path, .. }) if path == "state"
    ));
    assert!(matches!(
        descriptor_codec_allowing_all().encode(&toggle),
        Err(EncodeError::Describe(crate::DescribeError::UnsupportedFieldKind { field: "state", .. }))
    ));
}

#[test]
fn shared_but_acyclic_records_are_fine() {
    #[derive(Record)]
    struct Pair {
        a: Arc<TierStep>,
        b: Arc<TierStep>,
    }

    let shared = Arc::new(TierStep { step_id: 1 });
    let pair = Pair {
        a: Arc::clone(&shared),
        b: shared,
    };
    let codec = pattern_codec();
    let view = codec.decode(codec.encode(&pair).unwrap()).unwrap();
    assert_eq!(view.len(), 2);
}

// -----------------------------------------------------------------------------
// Malformed input

#[test]
fn truncated_buffer_is_malformed() {
    let codec = descriptor_codec();
    let bytes = codec.encode(&plan()).unwrap();

    for cut in [1, bytes.len() / 2, bytes.len() - 1] {
        let err = codec.decode(bytes.as_bytes()[..cut].to_vec()).unwrap_err();
        assert!(matches!(err.kind, MalformedKind::Truncated { .. } | MalformedKind::BadMagic));
    }

    let err = codec
        .read::<BenefitPlan>(bytes.as_bytes()[..bytes.len() - 1].to_vec())
        .unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
}

// -----------------------------------------------------------------------------
// Strategies

#[derive(Record)]
struct Bag {
    id: u32,
    payload: Box<dyn Reflect>,
}

#[test]
fn dynamic_fields_only_encode_under_pattern_matching() {
    let bag = Bag {
        id: 1,
        payload: Box::new(TierStep { step_id: 5 }),
    };

    let descriptor = descriptor_codec_allowing_all();
    assert!(matches!(
        descriptor.encode(&bag),
        Err(EncodeError::Describe(crate::DescribeError::UnsupportedFieldKind { field: "payload", .. }))
    ));

    let pattern = pattern_codec();
    let view = pattern.decode(pattern.encode(&bag).unwrap()).unwrap();
    let payload = view.field("payload").unwrap();
    assert_eq!(
        payload.as_record().unwrap().field("step_id").unwrap().as_i64(),
        Some(5)
    );
    assert!(matches!(
        pattern.materialize::<Bag>(&view),
        Err(MaterializeError::TypeMismatch { path, .. }) if path == "payload"
    ));
}

#[test]
fn strategies_read_each_other() {
    let original = plan();
    let descriptor = descriptor_codec();
    let pattern = pattern_codec();

    let from_descriptor = descriptor.encode(&original).unwrap();
    let from_pattern = pattern.encode(&original).unwrap();

    assert_eq!(pattern.read::<BenefitPlan>(from_descriptor.clone()).unwrap(), original);
    assert_eq!(descriptor.read::<BenefitPlan>(from_pattern).unwrap(), original);

    // Without pattern rules both write identical fields.
    let a = descriptor.decode(from_descriptor).unwrap();
    let b = pattern.decode(pattern.encode(&original).unwrap()).unwrap();
    assert_eq!(a.field_names().collect::<Vec<_>>(), b.field_names().collect::<Vec<_>>());
}

#[derive(Record, Debug, PartialEq)]
struct Account {
    id: u32,
    owner: String,
    secret_token: Option<String>,
}

#[test]
fn pattern_rules_select_fields() {
    let rules = "vc_record::*#identity=id#exclude=secret_*".parse().unwrap();
    let codec = Codec::pattern_matching(FilterPolicy::new(), rules);
    let account = Account {
        id: 3,
        owner: "ana".into(),
        secret_token: Some("x".into()),
    };

    let view = codec.decode(codec.encode(&account).unwrap()).unwrap();
    assert_eq!(view.field_names().collect::<Vec<_>>(), ["id", "owner"]);
    assert!(view.is_identity_field("id"));

    // Excluded nullable fields come back empty.
    let back: Account = codec.materialize(&view).unwrap();
    assert_eq!(back, Account { secret_token: None, ..account });

    let descriptor = codec.describe::<Account>().unwrap();
    assert!(descriptor.field("secret_token").is_none());
    assert!(descriptor.field("id").unwrap().is_identity());
}

// -----------------------------------------------------------------------------
// Materialize errors

#[derive(Record, Debug, PartialEq)]
#[record(type_path = "ledger::Entry")]
struct EntryV1 {
    amount: i64,
    label: String,
}

#[derive(Record, Debug, PartialEq)]
#[record(type_path = "ledger::Entry")]
struct EntryV2 {
    label: String,
    amount: u8,
    #[record(default)]
    note: String,
    flagged: Option<bool>,
}

#[derive(Record, Debug, PartialEq)]
#[record(type_path = "ledger::Entry")]
struct EntryV3 {
    label: String,
    currency: String,
}

#[derive(Record, Debug, PartialEq)]
#[record(type_path = "ledger::Entry")]
struct EntryWrong {
    label: i32,
}

fn ledger(amount: i64) -> LazyRecord {
    let codec = descriptor_codec_allowing_all();
    let bytes = codec
        .encode(&EntryV1 {
            amount,
            label: "fee".into(),
        })
        .unwrap();
    codec.decode(bytes).unwrap()
}

#[test]
fn fields_are_matched_by_name_with_defaults() {
    let codec = descriptor_codec_allowing_all();
    let entry: EntryV2 = codec.materialize(&ledger(200)).unwrap();
    assert_eq!(
        entry,
        EntryV2 {
            label: "fee".into(),
            amount: 200,
            note: String::new(),
            flagged: None,
        }
    );
}

#[test]
fn materialize_errors() {
    let codec = descriptor_codec_allowing_all();

    assert_eq!(
        codec.materialize::<EntryV3>(&ledger(1)),
        Err(MaterializeError::MissingField {
            ty: "ledger::Entry",
            field: "currency",
        })
    );

    let err = codec.materialize::<EntryV2>(&ledger(-1)).unwrap_err();
    assert!(matches!(err, MaterializeError::TypeMismatch { ref path, .. } if path == "amount"), "{err}");

    let err = codec.materialize::<EntryWrong>(&ledger(1)).unwrap_err();
    assert_eq!(
        err,
        MaterializeError::TypeMismatch {
            path: "label".into(),
            expected: "signed integer".into(),
            found: "string".into(),
        }
    );
}

#[derive(Record, Debug, PartialEq)]
#[record(type_path = "ledger::Flag")]
enum FlagV1 {
    Red,
    Amber,
}

#[derive(Record, Debug, PartialEq)]
#[record(type_path = "ledger::Flag")]
enum FlagV2 {
    Red,
    Green,
}

#[derive(Record)]
#[record(type_path = "ledger::Flagged")]
struct FlaggedV1 {
    flag: FlagV1,
}

#[derive(Record, Debug)]
#[record(type_path = "ledger::Flagged")]
struct FlaggedV2 {
    flag: FlagV2,
}

#[test]
fn unknown_enum_tag_is_a_mismatch() {
    let codec = descriptor_codec_allowing_all();
    let amber = codec.encode(&FlaggedV1 { flag: FlagV1::Amber }).unwrap();
    let err = codec.read::<FlaggedV2>(amber).unwrap_err();
    assert!(matches!(
        err,
        Error::Materialize(MaterializeError::TypeMismatch { ref found, .. }) if found == "enum tag `Amber`"
    ));

    let red = codec.encode(&FlaggedV1 { flag: FlagV1::Red }).unwrap();
    assert_eq!(codec.read::<FlaggedV2>(red).unwrap().flag, FlagV2::Red);
    let _ = FlagV2::Green;
}

#[derive(Record, Debug, PartialEq)]
struct Holder {
    step: TierStep,
}

#[derive(Record, Debug, PartialEq)]
struct OtherStep {
    step_id: i32,
}

#[derive(Record, Debug, PartialEq)]
#[record(type_path = "vc_record::codec::tests::Holder")]
struct OtherHolder {
    step: OtherStep,
}

#[test]
fn records_only_materialize_into_their_own_type() {
    let codec = descriptor_codec_allowing_all();
    let view = codec
        .decode(codec.encode(&Holder { step: TierStep { step_id: 4 } }).unwrap())
        .unwrap();

    let err = codec.materialize::<OtherHolder>(&view).unwrap_err();
    assert!(matches!(err, MaterializeError::TypeMismatch { ref path, .. } if path == "step"), "{err}");

    let err = codec.materialize::<OtherStep>(&view).unwrap_err();
    assert_eq!(
        err,
        MaterializeError::TypeMismatch {
            path: "<root>".into(),
            expected: ["record `", OtherStep::type_identity().path(), "`"].concat(),
            found: ["record `", Holder::type_identity().path(), "`"].concat(),
        }
    );
    assert_eq!(codec.materialize::<Holder>(&view).unwrap().step.step_id, 4);
}

#[test]
fn instants_beyond_four_digit_years_round_trip() {
    #[derive(Record, Debug, PartialEq)]
    struct Stamp {
        at: DateTime<Utc>,
    }

    let codec = pattern_codec();
    for year in [10000, -44] {
        let stamp = Stamp {
            at: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
        };
        let bytes = codec.encode(&stamp).unwrap();
        assert_eq!(codec.read::<Stamp>(bytes).unwrap(), stamp);
    }
}

#[test]
fn strategy_kind_defaults() {
    assert_eq!(Codec::builder().build().strategy(), StrategyKind::DescriptorDriven);
    assert!(!Codec::builder().build().permits(&Claim::type_identity()));
    assert!(pattern_codec().permits(&Claim::type_identity()));
}

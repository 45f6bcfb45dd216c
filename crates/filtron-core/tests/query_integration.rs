//! Integration tests for predicate construction and query execution.

use chrono::NaiveDate;
use filtron_core::builder::PredicateBuilder;
use filtron_core::catalog::{Catalog, EntityDef, RelationDef, ScalarType};
use filtron_core::engine::{EntityRow, MemoryStore, QueryEngine};
use filtron_core::Error;
use filtron_model::{Fragment, PageRequest, Predicate, SortSpec, Value};

struct TestContext {
    catalog: Catalog,
    store: MemoryStore,
}

impl TestContext {
    fn new() -> Self {
        Self {
            catalog: account_schema(),
            store: account_data(),
        }
    }

    fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.catalog, &self.store)
    }

    fn builder(&self) -> PredicateBuilder<'_> {
        PredicateBuilder::new(&self.catalog, "User").unwrap()
    }

    fn names(&self, predicate: &Predicate) -> Vec<String> {
        self.engine()
            .find_all("User", predicate)
            .unwrap()
            .iter()
            .map(|row| row.get("name").unwrap().as_str().unwrap().to_string())
            .collect()
    }
}

fn account_schema() -> Catalog {
    let user = EntityDef::new("User", "id")
        .with_scalar("id", ScalarType::Int64)
        .with_scalar("name", ScalarType::String)
        .with_scalar("status", ScalarType::String)
        .with_scalar("age", ScalarType::Int32)
        .with_scalar("signup_date", ScalarType::Date)
        .with_optional("deleted_at", ScalarType::DateTime)
        .with_scalar("address_id", ScalarType::Int64);

    let address = EntityDef::new("Address", "id")
        .with_scalar("id", ScalarType::Int64)
        .with_scalar("city", ScalarType::String);

    let role = EntityDef::new("Role", "id")
        .with_scalar("id", ScalarType::Int64)
        .with_scalar("name", ScalarType::String);

    let user_role = EntityDef::new("UserRole", "id")
        .with_scalar("id", ScalarType::Int64)
        .with_scalar("user_id", ScalarType::Int64)
        .with_scalar("role_id", ScalarType::Int64);

    Catalog::new()
        .with_entity(user)
        .with_entity(address)
        .with_entity(role)
        .with_entity(user_role)
        .with_relation(RelationDef::one_to_one(
            "address", "User", "address_id", "Address", "id",
        ))
        .with_relation(RelationDef::many_to_many(
            "roles", "User", "user_id", "Role", "role_id", "UserRole",
        ))
}

fn account_data() -> MemoryStore {
    let mut store = MemoryStore::new();

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let users = [
        (1i64, "John Doe", "ACTIVE", 30i32, date(2020, 5, 1), false, 1i64),
        (2, "Major", "PENDING", 45, date(2021, 8, 15), false, 1),
        (3, "Amy", "ACTIVE", 17, date(2022, 1, 3), true, 2),
        (4, "Jones", "DISABLED", 66, date(2019, 11, 30), false, 2),
    ];
    for (id, name, status, age, signup, deleted, address_id) in users {
        let deleted_at: Value = if deleted {
            date(2023, 6, 1).and_hms_opt(9, 0, 0).unwrap().into()
        } else {
            Value::Null
        };
        store.insert(
            "User",
            EntityRow::new()
                .with("id", id)
                .with("name", name)
                .with("status", status)
                .with("age", age)
                .with("signup_date", signup)
                .with("deleted_at", deleted_at)
                .with("address_id", address_id),
        );
    }

    store.insert(
        "Address",
        EntityRow::new().with("id", 1i64).with("city", "Quito"),
    );
    store.insert(
        "Address",
        EntityRow::new().with("id", 2i64).with("city", "Cuenca"),
    );

    for (id, name) in [(1i64, "ADMIN"), (2, "USER"), (3, "AUDITOR")] {
        store.insert("Role", EntityRow::new().with("id", id).with("name", name));
    }
    // John Doe holds two roles, so an undeduplicated role join would
    // return him twice.
    for (id, user_id, role_id) in [(1i64, 1i64, 1i64), (2, 1, 2), (3, 2, 2)] {
        store.insert(
            "UserRole",
            EntityRow::new()
                .with("id", id)
                .with("user_id", user_id)
                .with("role_id", role_id),
        );
    }

    store
}

#[test]
fn empty_builder_matches_every_record() {
    let ctx = TestContext::new();
    let predicate = ctx.builder().build();
    assert!(predicate.is_unrestricted());
    assert_eq!(ctx.engine().count("User", &predicate).unwrap(), 4);
}

#[test]
fn like_matches_substring_case_insensitively() {
    let ctx = TestContext::new();
    let predicate = ctx.builder().like("name", "jo").unwrap().build();
    let names = ctx.names(&predicate);
    assert!(names.contains(&"John Doe".to_string()));
    assert!(names.contains(&"Major".to_string()));
    assert!(names.contains(&"Jones".to_string()));
    assert!(!names.contains(&"Amy".to_string()));
}

#[test]
fn starts_with_and_ends_with_anchor_one_side() {
    let ctx = TestContext::new();
    let predicate = ctx.builder().starts_with("name", "jo").unwrap().build();
    let names = ctx.names(&predicate);
    assert_eq!(names.len(), 2); // John Doe, Jones but not Major

    let predicate = ctx.builder().ends_with("name", "OR").unwrap().build();
    assert_eq!(ctx.names(&predicate), vec!["Major".to_string()]);
}

#[test]
fn between_includes_both_bounds() {
    let ctx = TestContext::new();
    let predicate = ctx.builder().between("age", 17, 45).unwrap().build();
    let names = ctx.names(&predicate);
    assert_eq!(names.len(), 3); // 30, 45, 17 in range; 66 out
    assert!(!names.contains(&"Jones".to_string()));

    // Boundary values are included
    let predicate = ctx.builder().between("age", 66, 66).unwrap().build();
    assert_eq!(ctx.names(&predicate), vec!["Jones".to_string()]);
}

#[test]
fn conjunction_is_independent_of_append_order() {
    let ctx = TestContext::new();
    let a = ctx
        .builder()
        .eq("status", "ACTIVE")
        .unwrap()
        .ge("age", 18)
        .unwrap()
        .build();
    let b = ctx
        .builder()
        .ge("age", 18)
        .unwrap()
        .eq("status", "ACTIVE")
        .unwrap()
        .build();
    assert_eq!(ctx.names(&a), ctx.names(&b));
    assert_eq!(ctx.names(&a), vec!["John Doe".to_string()]);
}

#[test]
fn or_binds_to_the_last_fragment_only() {
    let ctx = TestContext::new();
    // age >= 18 AND (status = ACTIVE OR status = PENDING)
    let predicate = ctx
        .builder()
        .ge("age", 18)
        .unwrap()
        .eq("status", "ACTIVE")
        .unwrap()
        .or(Fragment::eq("status", "PENDING"))
        .build();
    let names = ctx.names(&predicate);
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"John Doe".to_string()));
    assert!(names.contains(&"Major".to_string()));
    // Amy is ACTIVE but 17: the OR did not swallow the age constraint.
    assert!(!names.contains(&"Amy".to_string()));
}

#[test]
fn status_disjunction_matches_either_status() {
    let ctx = TestContext::new();
    let predicate = ctx
        .builder()
        .eq("status", "ACTIVE")
        .unwrap()
        .or(Fragment::eq("status", "PENDING"))
        .build();
    let names = ctx.names(&predicate);
    assert_eq!(names.len(), 3); // John Doe, Amy (ACTIVE), Major (PENDING)
}

#[test]
fn optional_criteria_fall_away_without_branching() {
    let ctx = TestContext::new();
    // End-to-end scenario from the design contract: status filter present,
    // deletedAt must be null, role filter absent (empty collection).
    let roles: Vec<&str> = Vec::new();
    let predicate = ctx
        .builder()
        .eq("status", "ACTIVE")
        .unwrap()
        .is_null("deleted_at")
        .unwrap()
        .in_values("name", roles)
        .unwrap()
        .build();
    assert_eq!(predicate.terms().len(), 2);
    assert_eq!(ctx.names(&predicate), vec!["John Doe".to_string()]);
}

#[test]
fn membership_and_non_membership() {
    let ctx = TestContext::new();
    let predicate = ctx
        .builder()
        .in_values("status", ["ACTIVE", "PENDING"])
        .unwrap()
        .build();
    assert_eq!(ctx.names(&predicate).len(), 3);

    let predicate = ctx
        .builder()
        .not_in_values("status", ["ACTIVE", "PENDING"])
        .unwrap()
        .build();
    assert_eq!(ctx.names(&predicate), vec!["Jones".to_string()]);
}

#[test]
fn negative_operators_exclude_null_fields() {
    let ctx = TestContext::new();
    // Only Amy has a deleted_at; everyone else's is null. Under SQL
    // three-valued logic neither `<>` nor NOT IN matches null, so
    // excluding Amy's timestamp leaves nothing.
    let amy_deleted = NaiveDate::from_ymd_opt(2023, 6, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    let predicate = ctx.builder().ne("deleted_at", amy_deleted).unwrap().build();
    assert!(ctx.names(&predicate).is_empty());

    let predicate = ctx
        .builder()
        .not_in_values("deleted_at", [amy_deleted])
        .unwrap()
        .build();
    assert!(ctx.names(&predicate).is_empty());
}

#[test]
fn nested_path_resolves_through_to_one_relation() {
    let ctx = TestContext::new();
    let predicate = ctx.builder().eq("address.city", "Quito").unwrap().build();
    let names = ctx.names(&predicate);
    assert_eq!(names.len(), 2); // John Doe and Major share address 1
}

#[test]
fn invalid_segment_is_reported_by_name() {
    let ctx = TestContext::new();
    let err = ctx
        .builder()
        .eq("address.country.name", "EC")
        .unwrap_err();
    match err {
        Error::PathResolution {
            entity, segment, ..
        } => {
            assert_eq!(entity, "Address");
            assert_eq!(segment, "country");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn join_collapses_duplicate_rows() {
    let ctx = TestContext::new();
    // John Doe has roles ADMIN and USER; an IN over both would pair him
    // with two joined rows. The distinct request collapses him to one.
    let predicate = ctx
        .builder()
        .join_in("roles.name", ["ADMIN", "USER"])
        .unwrap()
        .build();
    assert!(predicate.requests_distinct());
    let names = ctx.names(&predicate);
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"John Doe".to_string()));
    assert!(names.contains(&"Major".to_string()));
}

#[test]
fn join_eq_filters_through_many_to_many() {
    let ctx = TestContext::new();
    let predicate = ctx.builder().join_eq("roles.name", "ADMIN").unwrap().build();
    assert_eq!(ctx.names(&predicate), vec!["John Doe".to_string()]);

    let predicate = ctx.builder().join_like("roles.name", "use").unwrap().build();
    let names = ctx.names(&predicate);
    assert_eq!(names.len(), 2); // John Doe and Major hold USER
}

#[test]
fn inner_join_drops_rows_without_related_records() {
    let ctx = TestContext::new();
    // Amy and Jones hold no roles at all.
    let predicate = ctx
        .builder()
        .join_in("roles.name", ["ADMIN", "USER", "AUDITOR"])
        .unwrap()
        .build();
    let names = ctx.names(&predicate);
    assert!(!names.contains(&"Amy".to_string()));
    assert!(!names.contains(&"Jones".to_string()));
}

#[test]
fn left_join_keeps_rows_and_substitutes_null() {
    let ctx = TestContext::new();
    // Users without roles survive the join with null substituted, which
    // still fails the ADMIN equality; only John Doe matches.
    let predicate = ctx
        .builder()
        .left_join_eq("roles.name", "ADMIN")
        .unwrap()
        .build();
    assert_eq!(ctx.names(&predicate), vec!["John Doe".to_string()]);
}

#[test]
fn date_operators_filter_by_calendar_date() {
    let ctx = TestContext::new();
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

    let predicate = ctx
        .builder()
        .date_eq("signup_date", date(2021, 8, 15))
        .unwrap()
        .build();
    assert_eq!(ctx.names(&predicate), vec!["Major".to_string()]);

    let predicate = ctx
        .builder()
        .date_between("signup_date", date(2020, 1, 1), date(2021, 12, 31))
        .unwrap()
        .build();
    assert_eq!(ctx.names(&predicate).len(), 2);

    let start = date(2023, 6, 1).and_hms_opt(0, 0, 0).unwrap();
    let end = date(2023, 6, 1).and_hms_opt(23, 59, 59).unwrap();
    let predicate = ctx
        .builder()
        .datetime_between("deleted_at", start, end)
        .unwrap()
        .build();
    assert_eq!(ctx.names(&predicate), vec!["Amy".to_string()]);
}

#[test]
fn build_twice_from_clone_yields_identical_predicates() {
    let ctx = TestContext::new();
    let builder = ctx.builder().eq("status", "ACTIVE").unwrap();
    let first = builder.clone().build();
    let second = builder.build();
    assert_eq!(first, second);
}

#[test]
fn pagination_windows_sorted_results() {
    let ctx = TestContext::new();
    let request = PageRequest::new(2, 2).with_sort(SortSpec::asc("age"));
    let page = ctx
        .engine()
        .find_page("User", &Predicate::matches_all(), &request)
        .unwrap();
    assert_eq!(page.total_items, 4);
    assert_eq!(page.total_pages(), 2);
    // ages sorted: 17, 30 | 45, 66
    let ages: Vec<i64> = page
        .items
        .iter()
        .map(|r| r.get("age").unwrap().as_i64().unwrap())
        .collect();
    assert_eq!(ages, vec![45, 66]);
}

#[test]
fn predicates_serialize_as_plain_data() {
    let ctx = TestContext::new();
    let predicate = ctx
        .builder()
        .eq("status", "ACTIVE")
        .unwrap()
        .is_null("deleted_at")
        .unwrap()
        .or(Fragment::is_not_null("deleted_at"))
        .build();
    let json = serde_json::to_string(&predicate).unwrap();
    let back: Predicate = serde_json::from_str(&json).unwrap();
    assert_eq!(predicate, back);
    assert_eq!(ctx.names(&predicate), ctx.names(&back));
}

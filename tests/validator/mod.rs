use check_rail::{
    Category, Configuration, ContractViolation, Exception, ExceptionKind, MaterializationState,
    ScopedContext, Validators,
};

fn context_value(entries: &[(String, String)], key: &str) -> Option<String> {
    entries.iter().find(|(k, _)| k == key).map(|(_, value)| value.clone())
}

#[test]
fn test_passing_chain_returns_the_value() {
    let validators = Validators::default();
    let port = validators.require_that(443_u16, "port").is_between(1, 1024).is_not_equal_to(&80);

    assert_eq!(port.name(), "port");
    assert_eq!(port.value(), Some(&443));
    assert!(!port.validation_failed());
    assert!(port.failures().is_empty());
    assert_eq!(port.or_throw().unwrap(), 443);
}

#[test]
fn test_failed_check_records_a_failure() {
    let validators = Validators::default();
    let age = validators.require_that(200, "age").is_between(0, 150);

    assert!(age.validation_failed());
    assert_eq!(age.value(), None);

    let failure = age.failures().first().unwrap();
    assert_eq!(failure.message(), "\"age\" must be between 0 (inclusive) and 150 (exclusive).");
    assert_eq!(failure.state(), MaterializationState::Unbuilt);
    assert_eq!(context_value(failure.context(), "actual").as_deref(), Some("200"));

    let exception = age.or_throw().unwrap_err();
    assert_eq!(exception.kind(), &ExceptionKind::OutOfBounds);
}

#[test]
fn test_later_checks_record_generic_failures() {
    let validators = Validators::default();
    let evaluated = std::cell::Cell::new(false);
    let name = validators
        .require_that("", "username")
        .satisfies(|name| !name.is_empty(), "\"username\" may not be empty")
        .satisfies(
            |_| {
                evaluated.set(true);
                true
            },
            "never recorded",
        )
        .is_equal_to(&"root");

    assert!(!evaluated.get());
    let failures = name.into_failures();
    assert_eq!(failures.len(), 3);
    assert_eq!(failures.messages()[0], "\"username\" may not be empty");

    let kinds: Vec<ExceptionKind> =
        failures.iter().map(|failure| failure.exception().kind().clone()).collect();
    assert_eq!(
        kinds,
        [ExceptionKind::InvalidArgument, ExceptionKind::InvalidState, ExceptionKind::InvalidState]
    );
}

#[test]
fn test_or_throw_combines_failures() {
    let validators = Validators::default();
    let exception = validators
        .require_that(5, "retries")
        .is_equal_to(&3)
        .is_not_equal_to(&5)
        .or_throw()
        .unwrap_err();

    assert_eq!(exception.message(), "\"retries\" must be equal to 3.");
    assert_eq!(exception.suppressed().len(), 1);
    assert_eq!(exception.suppressed()[0].kind(), &ExceptionKind::InvalidState);
}

#[test]
fn test_value_or_falls_back_after_failure() {
    let validators = Validators::default();
    assert_eq!(validators.require_that(-1, "threads").is_between(1, 64).value_or(4), 4);
    assert_eq!(validators.require_that(8, "threads").is_between(1, 64).value_or(4), 8);
}

#[test]
fn test_names_are_validated() {
    let validators = Validators::default();
    assert_eq!(
        validators.try_require_that(1, "").unwrap_err(),
        ContractViolation::InvalidName { name: String::new() }
    );
    assert_eq!(
        validators.try_require_that(1, "max size").unwrap_err(),
        ContractViolation::InvalidName { name: "max size".to_owned() }
    );
    assert!(validators.try_require_that(1, "maxSize").is_ok());
}

#[test]
#[should_panic(expected = "name may not be empty")]
fn test_require_that_panics_on_empty_name() {
    let _ = Validators::default().require_that(1, "");
}

#[test]
#[should_panic(expected = "name may not contain whitespace")]
fn test_assume_that_panics_on_whitespace() {
    let _ = Validators::default().assume_that(1, "a\tb");
}

#[test]
#[should_panic(expected = "name may not contain whitespace")]
fn test_map_panics_on_whitespace() {
    let _ = Validators::default().require_that("x", "input").map("input length", |s| s.len());
}

#[test]
fn test_assume_that_produces_assertions() {
    let validators = Validators::default();
    let exception = validators.assume_that(0, "divisor").is_not_equal_to(&0).or_throw().unwrap_err();

    assert_eq!(exception.kind(), &ExceptionKind::Assertion);
    assert_eq!(exception.category(), Category::Fatal);
    assert_eq!(exception.message(), "\"divisor\" may not be equal to 0.");
}

#[test]
fn test_validator_context_overrides_factory_context_overrides_scope() {
    let mut scope = ScopedContext::current();
    scope.put("source", "scope").put("request", 9);

    let validators = Validators::default().with_context("source", "factory").with_context("form", "login");

    let failure = validators.require_that(0, "attempts").is_between(1, 5).into_failures();
    let context = failure.iter().next().unwrap().context().to_vec();
    assert_eq!(context_value(&context, "source").as_deref(), Some("\"factory\""));
    assert_eq!(context_value(&context, "request").as_deref(), Some("9"));
    assert_eq!(context_value(&context, "form").as_deref(), Some("\"login\""));

    let failure = validators
        .require_that(0, "attempts")
        .with_context("source", "validator")
        .is_between(1, 5)
        .into_failures();
    let context = failure.iter().next().unwrap().context().to_vec();
    assert_eq!(context_value(&context, "source").as_deref(), Some("\"validator\""));
}

#[test]
fn test_context_is_captured_when_the_failure_is_recorded() {
    let validators = Validators::default();
    let validator = {
        let mut scope = ScopedContext::current();
        scope.put("phase", "import");
        validators.require_that(-1, "row").is_between(0, 100)
    };

    let exception = validator.or_throw().unwrap_err();
    assert_eq!(context_value(exception.context(), "phase").as_deref(), Some("\"import\""));
}

#[test]
fn test_factory_context_view() {
    let mut scope = ScopedContext::current();
    scope.put("region", "us").put("tenant", "scope");

    let validators = Validators::default().with_context("tenant", "factory");
    let view: Vec<(String, String)> = validators
        .context()
        .into_iter()
        .filter(|(key, _)| key == "region" || key == "tenant")
        .map(|(key, value)| (key, value.render()))
        .collect();
    assert_eq!(
        view,
        [
            ("region".to_owned(), "\"us\"".to_owned()),
            ("tenant".to_owned(), "\"factory\"".to_owned())
        ]
    );
}

#[test]
fn test_map_shares_the_failures() {
    let validators = Validators::default();
    let failures = validators
        .require_that("", "password")
        .satisfies(|value| !value.is_empty(), "\"password\" may not be empty")
        .map("password.length", |value| value.len())
        .is_between(8, 64)
        .into_failures();

    assert_eq!(failures.len(), 2);
    assert!(failures.messages()[1].starts_with("\"password.length\""));
}

#[test]
fn test_map_validates_the_derived_value() {
    let validators = Validators::default();
    let length = validators.require_that("secret", "password").map("password.length", |v| v.len());
    assert_eq!(length.name(), "password.length");

    let exception = length.is_between(8, 64).or_throw().unwrap_err();
    assert_eq!(exception.message(), "\"password.length\" must be between 8 (inclusive) and 64 (exclusive).");
}

#[test]
fn test_and_applies_grouped_checks() {
    fn is_even_percentage(validator: check_rail::Validator<i32>) -> check_rail::Validator<i32> {
        validator.is_between(0, 101).satisfies(|v| v % 2 == 0, "value must be even")
    }

    let validators = Validators::default();
    assert!(validators.require_that(42, "ratio").and(is_even_percentage).or_throw().is_ok());
    let failures = validators.require_that(43, "ratio").and(is_even_percentage).into_failures();
    assert_eq!(failures.messages(), ["value must be even"]);
}

#[test]
fn test_update_configuration_does_not_affect_existing_validators() {
    let mut validators = Validators::default();
    let before = validators.require_that(0, "count");

    validators.update_configuration(Configuration::with_assertion_transformer);
    assert!(validators.configuration().exception_transformer().is_some());

    let exception = before.is_between(1, 2).or_throw().unwrap_err();
    assert_eq!(exception.kind(), &ExceptionKind::OutOfBounds);

    let exception = validators.require_that(0, "count").is_between(1, 2).or_throw().unwrap_err();
    assert_eq!(exception.kind(), &ExceptionKind::Assertion);
}

#[test]
fn test_eager_configuration_builds_on_failure() {
    let validators = Validators::new(Configuration::eager());
    let validator = validators.require_that(0, "count").is_between(1, 2);
    assert_eq!(validator.failures().first().unwrap().state(), MaterializationState::RawBuilt);
}

#[test]
fn test_map_skips_the_derivation_after_a_failure() {
    let validators = Validators::default();
    let first = validators
        .require_that(Vec::<i32>::new(), "items")
        .satisfies(|items| !items.is_empty(), "\"items\" may not be empty")
        .map("first", |items| items[0]);

    assert_eq!(first.value(), None);

    let failures = first.is_between(0, 10).into_failures();
    assert_eq!(failures.len(), 2);
    assert_eq!(failures.messages()[0], "\"items\" may not be empty");
    assert_eq!(failures.exceptions()[1].kind(), &ExceptionKind::InvalidState);
}

#[test]
fn test_map_after_a_failure_falls_back_and_throws() {
    let validators = Validators::default();
    let derived = || {
        validators
            .require_that("", "path")
            .satisfies(|path| !path.is_empty(), "\"path\" may not be empty")
            .map("extension", |path| path.rsplit('.').next().map(str::to_owned))
    };

    assert_eq!(derived().value_or(Some("txt".to_owned())), Some("txt".to_owned()));
    let exception = derived().or_throw().unwrap_err();
    assert_eq!(exception.message(), "\"path\" may not be empty");
}

#[test]
fn test_assume_that_runs_the_factory_transformer_first() {
    let configuration = Configuration::default().with_exception_transformer(|raw| {
        Some(Exception::invalid_state(format!("checkout: {}", raw.message())))
    });
    let validators = Validators::new(configuration);

    let exception = validators.assume_that(0, "quantity").is_between(1, 100).or_throw().unwrap_err();
    assert_eq!(exception.kind(), &ExceptionKind::Assertion);
    assert!(exception.message().starts_with("checkout: \"quantity\" must be between 1"));
}

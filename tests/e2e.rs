//! End-to-end coverage over `Session`, exercising the seed scenarios and
//! malformed-input recovery from outside the crate, the way a REPL
//! transcript would.

use cam::session::Session;

#[test]
fn seed_scenarios_evaluate_to_their_expected_integers() {
  let cases: &[(&str, i64)] = &[
    ("42", 42),
    ("(+ 1 2)", 3),
    ("(+ 1 2 3 4)", 10),
    ("((lambda (x) x) 7)", 7),
    ("((lambda (x y) (+ x y)) 3 4)", 7),
    ("((lambda (f x) (f x x)) (lambda (a b) (+ a b)) 5)", 10),
  ];

  let mut session = Session::new();
  for (input, expected) in cases {
    assert_eq!(session.eval(input).unwrap(), *expected, "input: {input}");
  }
}

#[test]
fn scope_shadowing_resolves_to_the_innermost_binding() {
  let mut session = Session::new();
  assert_eq!(
    session
      .eval("((lambda (x) (lambda (x) x)) 1 2)")
      .unwrap(),
    2
  );
}

#[test]
fn variable_depth_selects_the_right_parameter_at_every_level() {
  // (lambda (x0 x1 x2) x1) applied to 10 20 30 should select 20.
  let mut session = Session::new();
  assert_eq!(
    session
      .eval("((lambda (x0 x1 x2) x1) 10 20 30)")
      .unwrap(),
    20
  );
}

#[test]
fn lone_open_paren_is_unexpected_end_of_input() {
  let mut session = Session::new();
  let err = session.eval("(").unwrap_err();
  assert_eq!(err.to_string(), "Unexpected end of input.");
}

#[test]
fn unbound_name_is_reported_by_name() {
  let mut session = Session::new();
  let err = session.eval("foo").unwrap_err();
  assert_eq!(err.to_string(), "Unbound variable: foo.");
}

#[test]
fn sum_of_fewer_than_two_operands_is_a_parse_error() {
  let mut session = Session::new();
  assert!(session.eval("(+ 1)").is_err());
  assert!(session.eval("(+)").is_err());
}

#[test]
fn an_overlong_identifier_does_not_crash_the_session() {
  let mut session = Session::new();
  // Over 10 characters: lexes as two adjacent VAR tokens rather than one,
  // so this is an application of `abcdefghij` to `k`, both unbound.
  let err = session.eval("abcdefghijk").unwrap_err();
  assert!(err.to_string().starts_with("Unbound variable:"));
}

#[test]
fn a_sequence_of_malformed_inputs_does_not_prevent_later_success() {
  let mut session = Session::new();
  assert!(session.eval("(").is_err());
  assert!(session.eval("foo").is_err());
  assert!(session.eval("(+ 1)").is_err());
  assert_eq!(session.eval("(+ 1 2 3 4)").unwrap(), 10);
  assert_eq!(
    session
      .eval("((lambda (f x) (f x x)) (lambda (a b) (+ a b)) 5)")
      .unwrap(),
    10
  );
}

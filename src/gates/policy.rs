use crate::constants::gates::{UNIT_TESTS, WORKFLOW_TESTS_AUTH, WORKFLOW_TESTS_PAYMENT};
use crate::models::EnvironmentName;

const DEV_GATES: &[&str] = &[];
const STAGE_GATES: &[&str] = &[UNIT_TESTS, WORKFLOW_TESTS_AUTH];
const PROD_GATES: &[&str] = &[UNIT_TESTS, WORKFLOW_TESTS_AUTH, WORKFLOW_TESTS_PAYMENT];

/// Ordered gate labels that must pass before deploying to `environment`
pub fn required_gates(environment: EnvironmentName) -> &'static [&'static str] {
    match environment {
        EnvironmentName::Dev => DEV_GATES,
        EnvironmentName::Stage => STAGE_GATES,
        EnvironmentName::Prod => PROD_GATES,
    }
}

pub fn has_gates(environment: EnvironmentName) -> bool {
    !required_gates(environment).is_empty()
}

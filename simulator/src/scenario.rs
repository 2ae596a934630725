//! Simulation scenarios.

use serde::{Deserialize, Serialize};

/// A simulation scenario: a scripted call stream with assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Steps in the scenario.
    pub steps: Vec<ScenarioStep>,
}

/// A step in a scenario. Operation steps may be rejected by the ledger
/// without failing the scenario; assertions must hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioStep {
    /// Direct transfer; `sender` is the caller.
    Transfer {
        sender: String,
        recipient: String,
        amount: u128,
    },
    /// Set an allowance; `owner` is the caller.
    Approve {
        owner: String,
        spender: String,
        amount: u128,
    },
    /// Delegated transfer; `spender` is the caller.
    TransferFrom {
        spender: String,
        owner: String,
        recipient: String,
        amount: u128,
    },
    /// Assert a condition.
    Assert { condition: AssertCondition },
}

/// Conditions that can be asserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssertCondition {
    /// Account balance equals.
    BalanceEquals { account: String, amount: u128 },
    /// Allowance equals.
    AllowanceEquals {
        owner: String,
        spender: String,
        amount: u128,
    },
    /// Sum of balances equals total supply.
    ConservationHolds,
    /// Number of `Transfer` events emitted so far.
    TransferEventCount { count: usize },
    /// Number of `Approval` events emitted so far.
    ApprovalEventCount { count: usize },
    /// The most recent operation was rejected with this error code.
    LastRejectionCode { code: String },
}

impl Scenario {
    /// Load a scenario by name.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "initial-distribution" => Ok(Self::initial_distribution()),
            "grant-and-spend" => Ok(Self::grant_and_spend()),
            "allowance-exhaustion" => Ok(Self::allowance_exhaustion()),
            "overdraft" => Ok(Self::overdraft()),
            "self-transfer" => Ok(Self::self_transfer()),
            _ => Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        }
    }

    /// Full supply sits with the treasury after construction.
    fn initial_distribution() -> Self {
        Self {
            name: "initial-distribution".to_string(),
            description: "Supply credited to the treasury, everyone else at zero".to_string(),
            steps: vec![
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "TREASURY".to_string(),
                        amount: 1_000_000,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "ALICE".to_string(),
                        amount: 0,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::ConservationHolds,
                },
            ],
        }
    }

    /// Approve then spend the allowance via delegated transfer.
    fn grant_and_spend() -> Self {
        Self {
            name: "grant-and-spend".to_string(),
            description: "Treasury grants ALICE an allowance, ALICE moves it to BOB".to_string(),
            steps: vec![
                ScenarioStep::Approve {
                    owner: "TREASURY".to_string(),
                    spender: "ALICE".to_string(),
                    amount: 1000,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::AllowanceEquals {
                        owner: "TREASURY".to_string(),
                        spender: "ALICE".to_string(),
                        amount: 1000,
                    },
                },
                ScenarioStep::TransferFrom {
                    spender: "ALICE".to_string(),
                    owner: "TREASURY".to_string(),
                    recipient: "BOB".to_string(),
                    amount: 1000,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::AllowanceEquals {
                        owner: "TREASURY".to_string(),
                        spender: "ALICE".to_string(),
                        amount: 0,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "BOB".to_string(),
                        amount: 1000,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::ApprovalEventCount { count: 1 },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::TransferEventCount { count: 1 },
                },
            ],
        }
    }

    /// Spending past an exhausted allowance is rejected.
    fn allowance_exhaustion() -> Self {
        Self {
            name: "allowance-exhaustion".to_string(),
            description: "Delegated spend past the approved amount is rejected".to_string(),
            steps: vec![
                ScenarioStep::Approve {
                    owner: "TREASURY".to_string(),
                    spender: "ALICE".to_string(),
                    amount: 1000,
                },
                ScenarioStep::TransferFrom {
                    spender: "ALICE".to_string(),
                    owner: "TREASURY".to_string(),
                    recipient: "BOB".to_string(),
                    amount: 1000,
                },
                ScenarioStep::TransferFrom {
                    spender: "ALICE".to_string(),
                    owner: "TREASURY".to_string(),
                    recipient: "BOB".to_string(),
                    amount: 1,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::LastRejectionCode {
                        code: "INSUFFICIENT_ALLOWANCE".to_string(),
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "BOB".to_string(),
                        amount: 1000,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::ConservationHolds,
                },
            ],
        }
    }

    /// Transfer from an empty account is rejected with no state change.
    fn overdraft() -> Self {
        Self {
            name: "overdraft".to_string(),
            description: "Transfer from an empty account is rejected atomically".to_string(),
            steps: vec![
                ScenarioStep::Transfer {
                    sender: "CAROL".to_string(),
                    recipient: "BOB".to_string(),
                    amount: 1000,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::LastRejectionCode {
                        code: "INSUFFICIENT_BALANCE".to_string(),
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "BOB".to_string(),
                        amount: 0,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::TransferEventCount { count: 0 },
                },
            ],
        }
    }

    /// Self-transfer is accepted, net-zero, and still emits.
    fn self_transfer() -> Self {
        Self {
            name: "self-transfer".to_string(),
            description: "Treasury pays itself; balance unchanged, one event".to_string(),
            steps: vec![
                ScenarioStep::Transfer {
                    sender: "TREASURY".to_string(),
                    recipient: "TREASURY".to_string(),
                    amount: 500,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "TREASURY".to_string(),
                        amount: 1_000_000,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::TransferEventCount { count: 1 },
                },
            ],
        }
    }
}

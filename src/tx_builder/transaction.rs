//! Transaction envelope and command planning
//!
//! A transaction is an ordered list of commands over a list of declared inputs.
//! Commands refer to values through [`Argument`]: a declared input, the result of
//! an earlier command, or the gas coin.
//!
//! ## Ordering
//! - `Result(i)` may only refer to a command with index lower than the one using it
//! - `Input(i)` must refer to an existing input
//!
//! Both rules are checked in [`Transaction::data`].

use crate::tx_builder::errors::TransactionBuilderError;
use crate::types::{MoveTarget, ObjectId, SuiAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee attributes of a transaction. `None` leaves the service default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    pub budget: Option<u64>,
    pub price: Option<u64>,
}

/// Reference to a specific version of an owned object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: String,
}

/// A declared transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS encoded plain value
    Pure(Vec<u8>),
    /// Owned object
    Object(ObjectRef),
}

/// Value passed to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::GasCoin => write!(f, "GasCoin"),
            Argument::Input(i) => write!(f, "Input({})", i),
            Argument::Result(i) => write!(f, "Result({})", i),
            Argument::NestedResult(i, j) => write!(f, "NestedResult({}, {})", i, j),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    pub target: MoveTarget,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(MoveCall),
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
}

impl Command {
    fn arguments(&self) -> Vec<Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.clone(),
            Command::TransferObjects { objects, address } => {
                let mut args = objects.clone();
                args.push(*address);
                args
            }
            Command::MergeCoins {
                destination,
                sources,
            } => {
                let mut args = vec![*destination];
                args.extend(sources.iter().copied());
                args
            }
        }
    }
}

/// Materialised transaction contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
    pub fee: FeeConfig,
}

/// Mutable transaction envelope
///
/// Owned by the caller while commands are attached, then moved into the signer.
#[derive(Debug, Default)]
pub struct Transaction {
    data: TransactionData,
    build_error: Option<TransactionBuilderError>,
}

impl Transaction {
    /// Create an empty envelope with no fee attributes
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fee_budget(&mut self, budget: u64) {
        self.data.fee.budget = Some(budget);
    }

    pub fn set_fee_price(&mut self, price: u64) {
        self.data.fee.price = Some(price);
    }

    pub fn fee(&self) -> &FeeConfig {
        &self.data.fee
    }

    pub fn input_count(&self) -> usize {
        self.data.inputs.len()
    }

    pub fn command_count(&self) -> usize {
        self.data.commands.len()
    }

    /// Declare a pure input from already BCS-encoded bytes
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Argument {
        self.push_input(CallArg::Pure(bytes))
    }

    /// Declare a UTF-8 string input
    pub fn pure_string(&mut self, value: &str) -> Argument {
        let mut bytes = Vec::with_capacity(value.len() + 5);
        write_uleb128(&mut bytes, value.len() as u64);
        bytes.extend_from_slice(value.as_bytes());
        self.pure_bytes(bytes)
    }

    pub fn pure_u64(&mut self, value: u64) -> Argument {
        self.pure_bytes(value.to_le_bytes().to_vec())
    }

    /// Declare an address input
    ///
    /// An unparsable address is recorded and reported by [`Transaction::data`].
    pub fn pure_address(&mut self, address: &str) -> Argument {
        match address.parse::<SuiAddress>() {
            Ok(addr) => self.pure_bytes(addr.as_bytes().to_vec()),
            Err(source) => {
                self.record_error(TransactionBuilderError::InvalidAddress {
                    value: address.to_string(),
                    source,
                });
                Argument::Input(self.data.inputs.len() as u16)
            }
        }
    }

    /// Declare an owned object input
    pub fn object(&mut self, object: ObjectRef) -> Argument {
        self.push_input(CallArg::Object(object))
    }

    /// Attach a Move call and return a handle to its result
    pub fn move_call(
        &mut self,
        target: MoveTarget,
        type_arguments: Vec<String>,
        arguments: Vec<Argument>,
    ) -> Argument {
        self.push_command(Command::MoveCall(MoveCall {
            target,
            type_arguments,
            arguments,
        }))
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, address: Argument) {
        self.push_command(Command::TransferObjects { objects, address });
    }

    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) {
        self.push_command(Command::MergeCoins {
            destination,
            sources,
        });
    }

    /// Materialise the transaction contents
    ///
    /// Fails with the first recorded build error, or when a command refers to an
    /// input or result that does not exist.
    pub fn data(&self) -> Result<&TransactionData, TransactionBuilderError> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }

        let input_count = self.data.inputs.len();
        for (index, command) in self.data.commands.iter().enumerate() {
            for arg in command.arguments() {
                let in_range = match arg {
                    Argument::GasCoin => true,
                    Argument::Input(i) => (i as usize) < input_count,
                    Argument::Result(i) | Argument::NestedResult(i, _) => (i as usize) < index,
                };
                if !in_range {
                    return Err(TransactionBuilderError::DanglingArgument {
                        command: index,
                        argument: arg.to_string(),
                    });
                }
            }
        }

        Ok(&self.data)
    }

    fn push_input(&mut self, input: CallArg) -> Argument {
        let index = self.data.inputs.len();
        if index >= u16::MAX as usize {
            self.record_error(TransactionBuilderError::CapacityExceeded {
                kind: "inputs",
                limit: u16::MAX as usize,
            });
            return Argument::Input(u16::MAX);
        }
        self.data.inputs.push(input);
        Argument::Input(index as u16)
    }

    fn push_command(&mut self, command: Command) -> Argument {
        let index = self.data.commands.len();
        if index >= u16::MAX as usize {
            self.record_error(TransactionBuilderError::CapacityExceeded {
                kind: "commands",
                limit: u16::MAX as usize,
            });
            return Argument::Result(u16::MAX);
        }
        self.data.commands.push(command);
        Argument::Result(index as u16)
    }

    fn record_error(&mut self, err: TransactionBuilderError) {
        // Keep the first one, later errors are usually knock-on effects
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }
}

fn write_uleb128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

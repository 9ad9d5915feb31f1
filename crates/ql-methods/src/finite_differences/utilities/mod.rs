//! Payoffs and inner value calculators.

pub mod inner_value_calculator;
pub mod payoff;

pub use inner_value_calculator::{FdmInnerValueCalculator, FdmLogInnerValue, FdmZeroInnerValue};
pub use payoff::{CashOrNothingPayoff, OptionType, Payoff, PlainVanillaPayoff};

//! Disposable Income Projection Engine for Dutch Salaries
//!
//! This crate projects yearly net and disposable income for an employee in the
//! Netherlands, combining the Box 1 progressive income tax, the labor and general
//! tax credits, and the multi-year expat ruling that exempts part of the salary
//! from tax.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;

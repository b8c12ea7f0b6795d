//
//  crm-client
//  api/resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Typed CRM resources.
//!
//! Each resource declares a static endpoint table and wraps an
//! [`ApiResource`](crate::api::ApiResource) with typed operations.

pub mod contacts;
pub mod leads;
pub mod opportunities;

pub use contacts::{Contact, ContactApi};
pub use leads::{Lead, LeadApi};
pub use opportunities::{Opportunity, OpportunityApi};

//! Business logic services

pub mod catalog;
pub mod loans;
pub mod stats;
pub mod students;
pub mod sweeper;
pub mod users;

use crate::{
    config::{AuthConfig, LoansConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub students: students::StudentsService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, loans_config: LoansConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            students: students::StudentsService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), loans_config),
            users: users::UsersService::new(repository.clone(), auth_config),
            stats: stats::StatsService::new(repository),
        }
    }
}

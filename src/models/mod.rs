pub mod company;
pub mod emission;
pub mod operational;
pub mod record;
pub mod report;
pub mod subdomain;

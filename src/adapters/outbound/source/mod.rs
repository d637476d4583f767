/// Repository checkout adapters
mod git_checkout;

pub use git_checkout::GitCheckout;

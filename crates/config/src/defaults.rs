pub fn default_initial_capacity() -> usize {
    4096
}

pub fn default_print_trades() -> bool {
    true
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_auction_name() -> String {
    "Double Limit Book Auction".to_string()
}

pub fn default_version() -> String {
    "1.0.0".to_string()
}

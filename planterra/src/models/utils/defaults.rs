use charybdis::types::Boolean;

pub fn default_to_true() -> Boolean {
    true
}

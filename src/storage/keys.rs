/// Key holding the identity of the logged-in user.
pub const SESSION_KEY: &str = "loggedUserEmail";

pub fn tasks_key(user_id: &str) -> String {
    format!("tasks_{}", user_id)
}

pub fn user_name_key(user_id: &str) -> String {
    format!("userName_{}", user_id)
}

pub fn user_password_key(user_id: &str) -> String {
    format!("userPassword_{}", user_id)
}

pub fn user_id_key(user_id: &str) -> String {
    format!("userId_{}", user_id)
}

pub const MAX_BIO_LEN: usize = 400;
pub const MAX_BADGE_LEN: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuildProfile {
    pub guild_id: u64,
    pub user_id: u64,
    pub bio: Option<String>,
    pub badge_number: Option<String>,
    pub updated_at: u64,
}

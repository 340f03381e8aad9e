// Shell services
// Services provide supporting functionality around the player page: settings persistence.

pub mod settings_store;

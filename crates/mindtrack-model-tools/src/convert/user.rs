use crate::convert::FromDbModel;
use mindtrack_entity::user::Model as UserModel;
use mindtrack_model::user::User;

impl FromDbModel<UserModel> for User {
    fn from_db_model(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

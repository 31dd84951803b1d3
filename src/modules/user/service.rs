use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::ENV;
use crate::api::error;

use crate::modules::user::model::{
    InsertUser, SignInModel, SignInResponse, SignUpModel, UserResponse, UserSearchResult,
};
use crate::modules::user::repository::UserRepository;
use crate::utils::{Claims, TypeClaims, hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn with_dependencies(repo: Arc<dyn UserRepository + Send + Sync>) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo }
    }

    pub async fn sign_up(&self, model: SignUpModel) -> Result<Uuid, error::SystemError> {
        let email = model.email.to_lowercase();

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(error::SystemError::bad_request("email_exists", "Email already exists"));
        }

        let hash_password = hash_password(&model.password)?;

        let user_id =
            self.repo.create(&InsertUser { email, hash_password, name: model.name }).await?;
        Ok(user_id)
    }

    pub async fn sign_in(&self, model: SignInModel) -> Result<SignInResponse, error::SystemError> {
        let user = self
            .repo
            .find_by_email(&model.email)
            .await?
            .ok_or_else(|| error::SystemError::bad_request("invalid_email", "Invalid Email"))?;

        let valid = verify_password(&user.hash_password, &model.password)?;
        if !valid {
            return Err(error::SystemError::bad_request("invalid_password", "Invalid Password"));
        }

        if !user.is_active {
            return Err(error::SystemError::bad_request("inactive_user", "Inactive Account"));
        }

        let profile = self
            .repo
            .find_profile(&user.id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("not_found", "Profile not found"))?;

        let access = Claims::new(&user.id, ENV.access_token_expiration, TypeClaims::AccessToken)
            .encode(ENV.jwt_secret.as_ref())?;
        let refresh =
            Claims::new(&user.id, ENV.refresh_token_expiration, TypeClaims::RefreshToken)
                .encode(ENV.jwt_secret.as_ref())?;

        Ok(SignInResponse {
            access,
            refresh,
            user: UserResponse { id: user.id, email: user.email, name: profile.name },
        })
    }

    pub async fn refresh(&self, token: &str) -> Result<String, error::SystemError> {
        let claims = Claims::decode(token, ENV.jwt_secret.as_ref()).map_err(|_| {
            error::SystemError::unauthorized("token_not_valid", "Token is invalid or expired")
        })?;

        if claims._type != TypeClaims::RefreshToken {
            return Err(error::SystemError::unauthorized(
                "token_not_valid",
                "Token is invalid or expired",
            ));
        }

        let user = self.repo.find_by_id(&claims.sub).await?.ok_or_else(|| {
            error::SystemError::unauthorized("token_not_valid", "Token is invalid or expired")
        })?;

        if !user.is_active {
            return Err(error::SystemError::unauthorized("inactive_user", "Inactive Account"));
        }

        let access = Claims::new(&user.id, ENV.access_token_expiration, TypeClaims::AccessToken)
            .encode(ENV.jwt_secret.as_ref())?;
        Ok(access)
    }

    pub async fn search(
        &self,
        actor_id: Uuid,
        query: &str,
    ) -> Result<Vec<UserSearchResult>, error::SystemError> {
        self.repo.search(query, &actor_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::schema::{ProfileEntity, UserEntity};
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryUsers {
        rows: Mutex<Vec<(UserEntity, ProfileEntity)>>,
    }

    #[async_trait::async_trait]
    impl UserRepository for InMemoryUsers {
        async fn find_by_id(
            &self,
            id: &Uuid,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|(u, _)| u.id == *id).map(|(u, _)| u.clone()))
        }

        async fn find_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .find(|(u, _)| u.email.eq_ignore_ascii_case(email))
                .map(|(u, _)| u.clone()))
        }

        async fn find_profile(
            &self,
            id: &Uuid,
        ) -> Result<Option<ProfileEntity>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|(u, _)| u.id == *id).map(|(_, p)| p.clone()))
        }

        async fn profile_exists(&self, id: &Uuid) -> Result<bool, error::SystemError> {
            Ok(self.find_profile(id).await?.is_some())
        }

        async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
            let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
            let now = chrono::Utc::now();
            let entity = UserEntity {
                id,
                email: user.email.clone(),
                hash_password: user.hash_password.clone(),
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            let profile = ProfileEntity {
                user_id: id,
                name: user.name.clone(),
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push((entity, profile));
            Ok(id)
        }

        async fn search(
            &self,
            query: &str,
            exclude: &Uuid,
        ) -> Result<Vec<UserSearchResult>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|(u, p)| {
                    u.id != *exclude
                        && (u.email.eq_ignore_ascii_case(query)
                            || p.name.to_lowercase().contains(&query.to_lowercase()))
                })
                .map(|(u, p)| UserSearchResult {
                    id: u.id,
                    email: u.email.clone(),
                    name: p.name.clone(),
                })
                .collect())
        }
    }

    fn test_env() {
        std::env::set_var("SECRET_KEY", "test-secret");
        std::env::set_var("DATABASE_URL", "postgres://localhost/amity_test");
    }

    fn service() -> UserService {
        test_env();
        UserService::with_dependencies(Arc::new(InMemoryUsers::default()))
    }

    fn sign_up_model(email: &str, name: &str) -> SignUpModel {
        SignUpModel { email: email.to_string(), password: "password123".to_string(), name: name.to_string() }
    }

    #[actix_web::test]
    async fn sign_up_rejects_duplicate_email() {
        let service = service();

        service.sign_up(sign_up_model("one@example.com", "User One")).await.unwrap();

        let err = service.sign_up(sign_up_model("One@Example.com", "Other")).await.unwrap_err();
        match err {
            error::SystemError::BadRequest { code, .. } => assert_eq!(code, "email_exists"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn sign_up_then_sign_in_issues_typed_tokens() {
        let service = service();
        let id = service.sign_up(sign_up_model("one@example.com", "User One")).await.unwrap();

        let response = service
            .sign_in(SignInModel {
                email: "one@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.id, id);
        assert_eq!(response.user.name, "User One");

        let access = Claims::decode(&response.access, b"test-secret").unwrap();
        let refresh = Claims::decode(&response.refresh, b"test-secret").unwrap();
        assert_eq!(access._type, TypeClaims::AccessToken);
        assert_eq!(refresh._type, TypeClaims::RefreshToken);
        assert_eq!(access.sub, id);
    }

    #[actix_web::test]
    async fn sign_in_with_wrong_password_is_rejected() {
        let service = service();
        service.sign_up(sign_up_model("one@example.com", "User One")).await.unwrap();

        let err = service
            .sign_in(SignInModel {
                email: "one@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .await
            .unwrap_err();
        match err {
            error::SystemError::BadRequest { code, .. } => assert_eq!(code, "invalid_password"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn sign_in_with_unknown_email_is_rejected() {
        let service = service();

        let err = service
            .sign_in(SignInModel {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();
        match err {
            error::SystemError::BadRequest { code, .. } => assert_eq!(code, "invalid_email"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn refresh_rejects_an_access_token() {
        let service = service();
        service.sign_up(sign_up_model("one@example.com", "User One")).await.unwrap();
        let response = service
            .sign_in(SignInModel {
                email: "one@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        let err = service.refresh(&response.access).await.unwrap_err();
        match err {
            error::SystemError::Unauthorized { code, .. } => assert_eq!(code, "token_not_valid"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn refresh_issues_a_new_access_token() {
        let service = service();
        let id = service.sign_up(sign_up_model("one@example.com", "User One")).await.unwrap();
        let response = service
            .sign_in(SignInModel {
                email: "one@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        let access = service.refresh(&response.refresh).await.unwrap();
        let claims = Claims::decode(&access, b"test-secret").unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims._type, TypeClaims::AccessToken);
    }

    #[actix_web::test]
    async fn search_excludes_the_caller() {
        let service = service();
        let one = service.sign_up(sign_up_model("one@example.com", "Test User")).await.unwrap();
        let two = service.sign_up(sign_up_model("two@example.com", "Test User Two")).await.unwrap();

        let results = service.search(one, "test").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, two);
    }
}

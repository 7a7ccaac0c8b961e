// src/services/auth.rs

use std::sync::Arc;

use async_trait::async_trait;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::{error::AppError, timestamp::Timestamp},
    db::{ClientRepository, IdentityRepository},
    models::{
        auth::{
            AuthResponse, Claims, Identity, LoginUserPayload, PasswordResetConfirmPayload,
            RegisterUserPayload, TokenPurpose,
        },
        client::{normalize_email, Client, Role},
    },
};

const SESSION_TTL_DAYS: i64 = 7;
const RESET_TTL_HOURS: i64 = 1;

// --- Estado da sessão ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
    MissingProfile, // identidade sem registro de cliente
    Inactive,       // cliente com isActive = false
}

/// Recalculado a cada requisição a partir do token e do registro do cliente.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Pending(PendingReason),
    Client(Client),
    Manager(Client),
}

impl SessionState {
    pub fn from_profile(profile: Option<Client>) -> Self {
        match profile {
            None => SessionState::Pending(PendingReason::MissingProfile),
            Some(client) if !client.is_active => SessionState::Pending(PendingReason::Inactive),
            Some(client) if client.is_manager() => SessionState::Manager(client),
            Some(client) => SessionState::Client(client),
        }
    }

    /// O cliente da sessão, se ela estiver ativa.
    pub fn into_active(self) -> Result<Client, AppError> {
        match self {
            SessionState::Client(c) | SessionState::Manager(c) => Ok(c),
            SessionState::Pending(_) => Err(AppError::AccountPending),
            SessionState::Unauthenticated => Err(AppError::InvalidToken),
        }
    }
}

// --- Envio do e-mail de redefinição ---

#[async_trait]
pub trait ResetMailer: Send + Sync {
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), AppError>;
}

/// Implementação padrão: só registra no log. Troque por um provedor real.
pub struct LogMailer;

#[async_trait]
impl ResetMailer for LogMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), AppError> {
        tracing::info!("✉️ Redefinição de senha solicitada para {}", email);
        tracing::debug!("Token de redefinição: {}", token);
        Ok(())
    }
}

// --- Serviço ---

#[derive(Clone)]
pub struct AuthService {
    identity_repo: IdentityRepository,
    client_repo: ClientRepository,
    jwt_secret: String,
    mailer: Arc<dyn ResetMailer>,
    bootstrap_manager_email: Option<String>,
}

impl AuthService {
    pub fn new(
        identity_repo: IdentityRepository,
        client_repo: ClientRepository,
        jwt_secret: String,
        mailer: Arc<dyn ResetMailer>,
        bootstrap_manager_email: Option<String>,
    ) -> Self {
        Self {
            identity_repo,
            client_repo,
            jwt_secret,
            mailer,
            bootstrap_manager_email: bootstrap_manager_email.map(|e| normalize_email(&e)),
        }
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&payload.email);

        if self.identity_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        // 1. Hashing fora do runtime assíncrono
        let password_hash = hash_password(payload.password).await?;

        // 2. Vincula ao cadastro feito pela oficina, se houver; senão cria um novo
        let (client, created) = match self.client_repo.find_by_email(&email).await? {
            Some(existing) => {
                tracing::info!("🔗 Identidade vinculada ao cliente existente {}", existing.id);
                (existing, false)
            }
            None => {
                let role = match &self.bootstrap_manager_email {
                    Some(bootstrap) if *bootstrap == email => Role::Manager,
                    _ => Role::Client,
                };
                let now = Timestamp::now();
                let client = Client {
                    id: Uuid::new_v4(),
                    first_name: payload.first_name.trim().to_string(),
                    last_name: payload.last_name.trim().to_string(),
                    email: email.clone(),
                    phone: payload.phone,
                    mobile: payload.mobile,
                    document: None,
                    fiscal_address: None,
                    postal_address: None,
                    role,
                    is_active: true,
                    profile_image_path: None,
                    created_at: Some(now.clone()),
                    updated_at: Some(now),
                };
                self.client_repo.create(&client).await?;
                (client, true)
            }
        };

        // 3. Identidade com o mesmo id do cliente (o "subject")
        let now = Timestamp::now();
        let identity = Identity {
            id: client.id,
            email,
            password_hash,
            reset_nonce: None,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        if let Err(e) = self.identity_repo.create(&identity).await {
            if created {
                // Limpeza compensatória: sem identidade, o cliente recém-criado fica órfão
                if let Err(cleanup) = self.client_repo.delete(client.id).await {
                    tracing::warn!("Cliente {} ficou sem identidade: {:?}", client.id, cleanup);
                }
            }
            return Err(e);
        }

        tracing::info!("👤 Nova identidade registrada: {}", identity.id);

        let user = SessionState::from_profile(Some(client)).into_active()?;
        let token = self.create_token(user.id, TokenPurpose::Session, Duration::days(SESSION_TTL_DAYS), None)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login_user(&self, payload: LoginUserPayload) -> Result<AuthResponse, AppError> {
        let identity = self
            .identity_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(payload.password, identity.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        // Sessão pendente = desconectado na hora
        let profile = self.client_repo.find_by_id(identity.id).await?;
        let user = SessionState::from_profile(profile).into_active()?;

        let token = self.create_token(user.id, TokenPurpose::Session, Duration::days(SESSION_TTL_DAYS), None)?;
        Ok(AuthResponse { token, user })
    }

    /// Estado da sessão para um bearer token (ou a falta dele).
    pub async fn resolve_session(&self, token: Option<&str>) -> Result<SessionState, AppError> {
        let Some(token) = token else {
            return Ok(SessionState::Unauthenticated);
        };
        let claims = self.decode_token(token, TokenPurpose::Session)?;
        let profile = self.client_repo.find_by_id(claims.sub).await?;
        Ok(SessionState::from_profile(profile))
    }

    /// Sempre responde OK, exista ou não a conta.
    /// Um novo pedido invalida os tokens de redefinição anteriores.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let Some(mut identity) = self.identity_repo.find_by_email(email).await? else {
            tracing::debug!("Redefinição pedida para e-mail sem identidade");
            return Ok(());
        };

        let nonce = Uuid::new_v4();
        identity.reset_nonce = Some(nonce);
        self.identity_repo.save(&identity).await?;

        let token = self.create_token(
            identity.id,
            TokenPurpose::PasswordReset,
            Duration::hours(RESET_TTL_HOURS),
            Some(nonce),
        )?;

        if let Err(e) = self.mailer.send_password_reset(&identity.email, &token).await {
            tracing::error!("Falha ao enviar e-mail de redefinição: {:?}", e);
        }
        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        payload: PasswordResetConfirmPayload,
    ) -> Result<(), AppError> {
        let claims = self.decode_token(&payload.token, TokenPurpose::PasswordReset)?;

        let mut identity = self
            .identity_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        // Uso único: o nonce some depois da troca
        if claims.jti.is_none() || claims.jti != identity.reset_nonce {
            return Err(AppError::InvalidToken);
        }

        identity.password_hash = hash_password(payload.new_password).await?;
        identity.reset_nonce = None;
        identity.updated_at = Some(Timestamp::now());
        self.identity_repo.save(&identity).await?;

        tracing::info!("🔑 Senha redefinida para a identidade {}", identity.id);
        Ok(())
    }

    fn decode_token(&self, token: &str, expected: TokenPurpose) -> Result<Claims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        if token_data.claims.purpose != expected {
            return Err(AppError::InvalidToken);
        }
        Ok(token_data.claims)
    }

    fn create_token(
        &self,
        subject: Uuid,
        purpose: TokenPurpose,
        ttl: Duration,
        jti: Option<Uuid>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: subject,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            purpose,
            jti,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

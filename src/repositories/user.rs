//! UserRepository - Repository per utenti, profili studente/consulente e directory consulenti

use super::{Create, Read};
use crate::core::{ListQuery, Page, PageParams, SqlFilter, UpdateBuilder};
use crate::dtos::{ConsultantListQuery, NewUser, UpdateProfileDTO};
use crate::entities::{Consultant, ConsultantProfile, Role, StudentProfile, User};
use sqlx::{Error, MySqlConnection, MySqlPool};
use tracing::{debug, instrument};

const USER_SELECT: &str = "SELECT id, name, email, password, phone, role, created_at FROM users";

const CONSULTANT_SELECT: &str = "SELECT us.id, us.name, us.email, us.phone, cp.company_name, \
     cp.license_number, cp.city, cp.experience_years, cp.bio, us.created_at \
     FROM users us JOIN consultant_profiles cp ON cp.user_id = us.id";
const CONSULTANT_COUNT: &str =
    "SELECT COUNT(*) FROM users us JOIN consultant_profiles cp ON cp.user_id = us.id";

pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }

    /// L'email è univoca, il confronto usa la collation della colonna
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(&format!("{} WHERE email = ?", USER_SELECT))
            .bind(email)
            .fetch_optional(&self.connection_pool)
            .await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }

    // ---- operazioni dentro una transazione aperta dal service ----

    /// INSERT in `users`; ritorna l'id generato
    #[instrument(skip(self, conn, data), fields(email = %data.email, role = %data.role))]
    pub async fn insert_tx(&self, conn: &mut MySqlConnection, data: &NewUser) -> Result<i32, Error> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password, phone, role) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.phone)
        .bind(data.role.as_str())
        .execute(&mut *conn)
        .await?;
        debug!("User row inserted");
        Ok(result.last_insert_id() as i32)
    }

    pub async fn read_tx(&self, conn: &mut MySqlConnection, id: i32) -> Result<User, Error> {
        sqlx::query_as::<_, User>(&format!("{} WHERE id = ?", USER_SELECT))
            .bind(id)
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn insert_student_profile_tx(
        &self,
        conn: &mut MySqlConnection,
        profile: &StudentProfile,
    ) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO student_profiles (user_id, interested_country, interested_course, study_level, city) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(profile.user_id)
        .bind(&profile.interested_country)
        .bind(&profile.interested_course)
        .bind(&profile.study_level)
        .bind(&profile.city)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn insert_consultant_profile_tx(
        &self,
        conn: &mut MySqlConnection,
        profile: &ConsultantProfile,
    ) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO consultant_profiles (user_id, company_name, license_number, city, experience_years, bio) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(profile.user_id)
        .bind(&profile.company_name)
        .bind(&profile.license_number)
        .bind(&profile.city)
        .bind(profile.experience_years)
        .bind(&profile.bio)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Aggiorna `users` e la riga di profilo del ruolo dell'utente.
    ///
    /// Una riga di profilo mancante viene creata; restituisce `Ok(false)` solo
    /// per un consulente senza profilo e senza `company_name` nel body.
    #[instrument(skip(self, conn, data))]
    pub async fn update_profile_tx(
        &self,
        conn: &mut MySqlConnection,
        user_id: i32,
        role: Role,
        data: &UpdateProfileDTO,
    ) -> Result<bool, Error> {
        let mut user = UpdateBuilder::new("users");
        user.set("name", data.name.clone())
            .set("phone", data.phone.clone());
        user.execute("id", user_id, &mut *conn).await?;

        match role {
            Role::Student => {
                let mut profile = UpdateBuilder::new("student_profiles");
                profile
                    .set("interested_country", data.interested_country.clone())
                    .set("interested_course", data.interested_course.clone())
                    .set("study_level", data.study_level.clone())
                    .set("city", data.city.clone());
                if !profile.is_empty() {
                    // tutte le colonne del profilo studente sono nullable
                    sqlx::query("INSERT IGNORE INTO student_profiles (user_id) VALUES (?)")
                        .bind(user_id)
                        .execute(&mut *conn)
                        .await?;
                    profile.execute("user_id", user_id, &mut *conn).await?;
                }
            }
            Role::Consultant => {
                let mut profile = UpdateBuilder::new("consultant_profiles");
                profile
                    .set("company_name", data.company_name.clone())
                    .set("license_number", data.license_number.clone())
                    .set("city", data.city.clone())
                    .set("experience_years", data.experience_years)
                    .set("bio", data.bio.clone());
                if !profile.is_empty() {
                    let existing: Option<i32> = sqlx::query_scalar(
                        "SELECT user_id FROM consultant_profiles WHERE user_id = ? FOR UPDATE",
                    )
                    .bind(user_id)
                    .fetch_optional(&mut *conn)
                    .await?;
                    if existing.is_none() {
                        // company_name è NOT NULL: senza di esso la riga non si può creare
                        let Some(company_name) = data.company_name.as_ref() else {
                            return Ok(false);
                        };
                        sqlx::query(
                            "INSERT INTO consultant_profiles (user_id, company_name) VALUES (?, ?)",
                        )
                        .bind(user_id)
                        .bind(company_name)
                        .execute(&mut *conn)
                        .await?;
                    }
                    profile.execute("user_id", user_id, &mut *conn).await?;
                }
            }
            Role::Admin => {}
        }
        Ok(true)
    }

    // ---- profili ----

    pub async fn student_profile(&self, user_id: i32) -> Result<Option<StudentProfile>, Error> {
        sqlx::query_as::<_, StudentProfile>(
            "SELECT user_id, interested_country, interested_course, study_level, city \
             FROM student_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn consultant_profile(&self, user_id: i32) -> Result<Option<ConsultantProfile>, Error> {
        sqlx::query_as::<_, ConsultantProfile>(
            "SELECT user_id, company_name, license_number, city, experience_years, bio \
             FROM consultant_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    // ---- liste ----

    #[instrument(skip(self))]
    pub async fn list_by_role(
        &self,
        role: Role,
        search: Option<&str>,
        params: PageParams,
    ) -> Result<Page<User>, Error> {
        let filter = SqlFilter::new()
            .eq("role", role.as_str())
            .search(&["name", "email"], search);
        ListQuery::new(USER_SELECT, "SELECT COUNT(*) FROM users")
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, params)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_consultants(&self, query: &ConsultantListQuery) -> Result<Page<Consultant>, Error> {
        let filter = SqlFilter::new()
            .eq("us.role", Role::Consultant.as_str())
            .eq_text("cp.city", query.city.as_deref())
            .search(&["us.name", "cp.company_name"], query.search.as_deref());
        ListQuery::new(CONSULTANT_SELECT, CONSULTANT_COUNT)
            .filter(filter)
            .order_by("us.created_at DESC, us.id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }
}

impl Create<User, NewUser> for UserRepository {
    async fn create(&self, data: &NewUser) -> Result<User, Error> {
        let mut conn = self.connection_pool.acquire().await?;
        let id = self.insert_tx(&mut *conn, data).await?;
        self.read_tx(&mut *conn, id).await
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(&format!("{} WHERE id = ?", USER_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

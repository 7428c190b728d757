//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod blog;
pub mod country;
pub mod course;
pub mod job;
pub mod lead;
pub mod misc;
pub mod query;
pub mod university;
pub mod user;
pub mod visa;

// Re-exports per facilitare l'import
pub use blog::{
    BlogCategoryDTO, BlogDTO, BlogListQuery, CommentListQuery, CommentThreadDTO, CreateBlogDTO,
    CreateCommentDTO, NewBlog, UpdateBlogDTO,
};
pub use country::{CreateCountryDTO, UpdateCountryDTO};
pub use course::{CourseListQuery, CourseSort, CreateCourseDTO, SubjectDTO, UpdateCourseDTO};
pub use job::{ApplyJobDTO, CreateJobDTO, JobListQuery, UpdateJobDTO};
pub use lead::{CreateFreeConsultationDTO, CreateLeadDTO, LeadListQuery, UpdateLeadStatusDTO};
pub use misc::{
    AddWishlistDTO, CreateNotificationDTO, NotificationListQuery, ResumeDTO, SearchResultsDTO,
    UploadResponseDTO,
};
pub use query::{PageQuery, SearchQuery};
pub use university::{
    CreateUniversityDTO, UniversityDetailDTO, UniversityListQuery, UpdateUniversityDTO,
};
pub use user::{
    ConsultantListQuery, CreateAdminDTO, LoginDTO, LoginResponseDTO, NewUser, ProfileDTO, RegisterConsultantDTO,
    RegisterStudentDTO, UpdateProfileDTO, UserDTO,
};
pub use visa::{
    CreateVisaCountryDTO, CreateVisaRequirementDTO, CreateVisaTypeDTO, UpdateVisaCountryDTO,
    UpdateVisaRequirementDTO, UpdateVisaTypeDTO, VisaCountryDetailDTO, VisaRequirementListQuery,
    VisaTypeDetailDTO, VisaTypeListQuery,
};

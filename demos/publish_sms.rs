use std::io;

use sns_sms::{
    CredentialSource, MessageText, PhoneNumber, PublishRequest, Region, SmsOptions, SmsType,
    SnsClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let phone_raw = std::env::var("SNS_SMS_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SNS_SMS_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("SNS_SMS_MESSAGE")
        .unwrap_or_else(|_| "Hello from the sns-sms demo.".to_owned());
    let region = std::env::var("AWS_REGION").unwrap_or_else(|_| Region::DEFAULT.to_owned());
    let profile = std::env::var("SNS_SMS_PROFILE").ok();

    let credentials = match profile {
        Some(profile) => CredentialSource::shared(None, Some(profile)),
        None => CredentialSource::default_chain(),
    };
    let client = SnsClient::builder(Region::new(region)?)
        .credentials(credentials)
        .build()
        .await?;

    let options = SmsOptions {
        sms_type: SmsType::Transactional,
        ..Default::default()
    };
    let request = PublishRequest::sms(
        PhoneNumber::new(phone_raw),
        MessageText::new(message),
        &options,
    );

    let response = client.publish(request).await?;
    println!(
        "message_id: {}, request_id: {:?}",
        response.message_id, response.request_id
    );

    Ok(())
}
